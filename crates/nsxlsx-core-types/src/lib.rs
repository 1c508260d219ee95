//! Core types shared across nsxlsx facilities
//!
//! - **Correlation types**: RunId, RunContext
//! - **Schema constants**: Canonical log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RunContext, RunId};
