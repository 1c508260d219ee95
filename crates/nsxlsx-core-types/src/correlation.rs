//! Correlation types for run tracking
//!
//! Every invocation of the pipeline (acquire → reconcile → save) carries a
//! `RunId` so that log lines from the provider, the engine and the store can
//! be tied back to a single run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new time-ordered RunId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
    /// Subject whose metrics are being captured (e.g. a nation name)
    pub source_identifier: Option<String>,
}

impl RunContext {
    /// Create a new context with a fresh RunId
    pub fn new() -> Self {
        Self {
            run_id: RunId::new(),
            source_identifier: None,
        }
    }

    /// Attach the source identifier to the context
    pub fn with_source_identifier(mut self, source: impl Into<String>) -> Self {
        self.source_identifier = Some(source.into());
        self
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
