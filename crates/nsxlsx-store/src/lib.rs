//! nsxlsx store - on-disk sheet stores
//!
//! Provides:
//! - `SheetStore`, which opens a store path as a `StoreHandle` and saves a
//!   reconciled workbook back to it
//! - XLSX and JSON codecs behind the `SheetCodec` trait
//! - Atomic save (temp file then rename)

pub mod atomic;
pub mod codec;
pub mod errors;
pub mod store;

// Re-export key types
pub use codec::{SheetCodec, StoreFormat};
pub use errors::Result;
pub use store::SheetStore;
