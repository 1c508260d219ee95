//! nsxlsx engine - orchestration layer
//!
//! Wires a `Provider` (where snapshots come from) to an `Outputter` (where
//! they are appended), both configured from one `Configuration`. The engine
//! owns lifecycle logging for the `acquire` and `output` operations; core
//! and store only emit `tracing::debug!` details.

pub mod config;
pub mod outputter;
pub mod persistence;
pub mod pipeline;
pub mod provider;

pub use config::{ConfigFile, Configurable, Configuration};
pub use outputter::{AppendingOutputter, Outputter};
pub use persistence::{OutputReport, PersistenceEngine};
pub use pipeline::{acquire, run_once};
pub use provider::{Provider, ProviderKind};
