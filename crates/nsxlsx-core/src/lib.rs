//! nsxlsx core - snapshot model and append-only reconciliation
//!
//! This crate holds everything that does not touch the network or the disk:
//! - `SnapshotTree`, the typed tree carrying one acquired snapshot
//! - The in-memory workbook grid (`Workbook`, `Sheet`, `CellAddress`)
//! - Column resolution, row appending and per-cell policies
//! - Two-mode (create/append) reconciliation over a `StoreHandle`
//! - The error facility and structured logging facility shared by all crates

pub mod append;
pub mod errors;
pub mod grid;
pub mod layout;
pub mod logging_facility;
pub mod policy;
pub mod reconcile;
pub mod resolve;
pub mod snapshot;

#[doc(hidden)]
pub use tracing as __tracing;

pub use nsxlsx_core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, NsxError, Result};
pub use grid::{CellAddress, Sheet, Workbook};
pub use layout::{LayoutPolicy, SheetLayout};
pub use policy::{CellPolicy, CellWrite};
pub use reconcile::{reconcile, OutputMode, Reconciled, SheetOutcome, StoreHandle};
pub use resolve::ColumnResolver;
pub use snapshot::{NodeId, NodeRef, SnapshotTree};
