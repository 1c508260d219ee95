//! Offline provider reading a snapshot from a JSON file

use std::fs;
use std::path::PathBuf;

use nsxlsx_core::snapshot::{NodeKind, TIMESTAMP_FIELD};
use nsxlsx_core::SnapshotTree;

use super::{capture_timestamp, not_configured, Provider, ProviderKind};
use crate::config::{Configurable, Configuration, OPT_INPUT_PATH};
use nsxlsx_core::errors::NsxError;
use nsxlsx_store::errors::{io_error, Result};

/// Reads `{ "<sheet>": { "<field>": value } }` from `input_path`
///
/// Sheets without a `Timestamp` field get the capture time.
#[derive(Debug, Clone, Default)]
pub struct JsonFileProvider {
    input_path: Option<PathBuf>,
}

impl JsonFileProvider {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: Some(input_path.into()),
        }
    }
}

impl Configurable for JsonFileProvider {
    fn configure(&mut self, config: &Configuration) -> Result<()> {
        self.input_path = Some(PathBuf::from(config.require(OPT_INPUT_PATH)?));
        Ok(())
    }
}

impl Provider for JsonFileProvider {
    fn get(&self) -> Result<SnapshotTree> {
        let path = self
            .input_path
            .as_ref()
            .ok_or_else(|| not_configured(ProviderKind::JsonFile))?;
        let content = fs::read_to_string(path).map_err(|e| io_error("read_input", e))?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(NsxError::from)?;
        let mut tree = SnapshotTree::from_json(&value)?;

        let timestamp = capture_timestamp();
        let missing: Vec<_> = tree
            .root()
            .children()
            .filter(|sheet| sheet.kind() == NodeKind::Group)
            .filter(|sheet| sheet.child(TIMESTAMP_FIELD).is_none())
            .map(|sheet| sheet.id())
            .collect();
        for sheet in missing {
            tree.insert_leaf(sheet, TIMESTAMP_FIELD, timestamp.as_str())?;
        }

        tracing::debug!(
            path = %path.display(),
            sheets = tree.root().children().count(),
            "read snapshot file"
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsxlsx_core::errors::ExErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_reads_sheets_and_injects_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(
            &path,
            r#"{ "Economy": { "GDP": 100, "Timestamp": "t1" }, "Rights": { "Civil Rights": "Good" } }"#,
        )
        .unwrap();

        let tree = JsonFileProvider::new(&path).get().unwrap();

        let economy = tree.root().child("Economy").unwrap();
        assert_eq!(economy.child("Timestamp").and_then(|c| c.value()), Some("t1"));
        let rights = tree.root().child("Rights").unwrap();
        assert!(rights.child("Timestamp").and_then(|c| c.value()).is_some());
    }

    #[test]
    fn test_configure_requires_input_path() {
        let mut provider = JsonFileProvider::default();

        let err = provider.configure(&Configuration::new()).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Configuration);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();

        let err = JsonFileProvider::new(dir.path().join("absent.json"))
            .get()
            .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Io);
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, "{ nope").unwrap();

        let err = JsonFileProvider::new(&path).get().unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
