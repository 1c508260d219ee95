//! Run configuration
//!
//! Options are plain string key/value pairs shared by every provider and
//! outputter; each component reads the keys it recognizes. An optional TOML
//! file supplies defaults and sheet layouts, and command-line flags override
//! single options on top of it.
//!
//! ```toml
//! [options]
//! user_agent = "nsxlsx (admin@example.org)"
//! request_timeout_secs = 20
//!
//! [layout.default]
//! columns = ["Timestamp"]
//!
//! [layout.sheets."Economy"]
//! title = "Economy"
//! columns = ["Timestamp", "GDP (billion)"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use nsxlsx_core::errors::{ExError, ExErrorKind, NsxError};
use nsxlsx_core::layout::LayoutPolicy;
use serde::Deserialize;

use nsxlsx_store::errors::{io_error, Result};

/// Name (or id) of the entity whose statistics are fetched
pub const OPT_SOURCE_IDENTIFIER: &str = "source_identifier";
/// Path of the store to create or append to
pub const OPT_STORE_PATH: &str = "store_path";
/// Snapshot file read by the JSON file provider
pub const OPT_INPUT_PATH: &str = "input_path";
/// User-Agent sent to the HTTP API
pub const OPT_USER_AGENT: &str = "user_agent";
/// HTTP request timeout in whole seconds
pub const OPT_REQUEST_TIMEOUT_SECS: &str = "request_timeout_secs";
/// Base URL of the HTTP API
pub const OPT_API_BASE_URL: &str = "api_base_url";

/// String options with typed accessors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    options: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one option, replacing any earlier value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Value of `key`, treating blank values as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Value of `key` or `MissingOption`
    pub fn require(&self, key: &str) -> std::result::Result<&str, NsxError> {
        self.get(key).ok_or_else(|| NsxError::MissingOption {
            key: key.to_string(),
        })
    }

    /// Parsed value of `key`, `None` when absent
    pub fn get_parsed<T>(&self, key: &str) -> std::result::Result<Option<T>, NsxError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| NsxError::InvalidOption {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Apply every option of `other` on top of this one
    pub fn merge(&mut self, other: &Configuration) {
        for (key, value) in &other.options {
            self.options.insert(key.clone(), value.clone());
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }
}

/// Component that reads its settings from a `Configuration`
pub trait Configurable {
    /// Validate and store the options this component recognizes
    ///
    /// # Errors
    ///
    /// `ERR_CONFIGURATION` when a required option is missing or malformed.
    fn configure(&mut self, config: &Configuration) -> Result<()>;
}

/// On-disk configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    options: BTreeMap<String, toml::Value>,
    #[serde(default)]
    layout: LayoutPolicy,
}

impl ConfigFile {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| io_error("read_config", e))?;
        Self::parse_str(&content).map_err(|e| {
            let message = format!("Invalid config file '{}': {}", path.display(), e.message());
            e.with_message(message)
        })
    }

    pub fn parse_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ExError::new(ExErrorKind::Configuration)
                .with_op("load_config")
                .with_message(e.to_string())
        })
    }

    /// Options as strings; non-string TOML values use their TOML text
    pub fn configuration(&self) -> Configuration {
        let mut config = Configuration::new();
        for (key, value) in &self.options {
            let text = match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            config.set(key.as_str(), text);
        }
        config
    }

    pub fn layout(&self) -> &LayoutPolicy {
        &self.layout
    }

    pub fn into_parts(self) -> (Configuration, LayoutPolicy) {
        let config = self.configuration();
        (config, self.layout)
    }
}
