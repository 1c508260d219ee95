//! Snapshot providers
//!
//! A provider produces one `SnapshotTree` per call: the root has one group
//! per sheet, and every sheet carries leaf fields plus the reserved
//! `Timestamp` leaf.

mod json_file;
mod nationstates;

use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use nsxlsx_core::errors::{ExError, ExErrorKind};
use nsxlsx_core::SnapshotTree;

use crate::config::Configurable;
use nsxlsx_store::errors::Result;

pub use json_file::JsonFileProvider;
pub use nationstates::{parse_nation, NationStatesProvider, DEFAULT_API_BASE_URL};

/// Source of snapshots
pub trait Provider: Configurable {
    /// Acquire one snapshot
    ///
    /// # Errors
    ///
    /// `ERR_ACQUISITION` when the source cannot be reached or returns data
    /// that cannot be shaped into sheets; `ERR_CONFIGURATION` when called
    /// before `configure`.
    fn get(&self) -> Result<SnapshotTree>;
}

/// Closed set of provider variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    NationStates,
    JsonFile,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::NationStates => "nationstates",
            ProviderKind::JsonFile => "json-file",
        }
    }

    /// Unconfigured provider of this kind
    pub fn build(self) -> Box<dyn Provider> {
        match self {
            ProviderKind::NationStates => Box::new(NationStatesProvider::default()),
            ProviderKind::JsonFile => Box::new(JsonFileProvider::default()),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ExError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nationstates" => Ok(ProviderKind::NationStates),
            "json-file" | "json" => Ok(ProviderKind::JsonFile),
            other => Err(ExError::new(ExErrorKind::Configuration)
                .with_op("select_provider")
                .with_message(format!(
                    "Unknown provider '{}': expected nationstates or json-file",
                    other
                ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capture time in RFC 3339, UTC, whole seconds
pub fn capture_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Create an acquisition error
pub fn acquisition_error(op: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Acquisition)
        .with_op(op.to_string())
        .with_message(message)
}

/// Error for a provider used before `configure`
pub(crate) fn not_configured(provider: ProviderKind) -> ExError {
    ExError::new(ExErrorKind::Configuration)
        .with_op("acquire")
        .with_message(format!("Provider '{}' used before configure", provider))
}
