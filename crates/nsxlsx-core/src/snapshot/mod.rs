//! Snapshot model
//!
//! A snapshot is built once per acquisition and consumed read-only by the
//! reconciliation engine.

pub mod tree;

pub use tree::{NodeId, NodeKind, NodeRef, SnapshotTree};

/// Reserved field carrying the capture time on every sheet
pub const TIMESTAMP_FIELD: &str = "Timestamp";
