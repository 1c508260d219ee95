//! Outputters
//!
//! An outputter consumes one snapshot per run. The appending outputter binds
//! the `store_path` option to a `PersistenceEngine`.

use nsxlsx_core::layout::LayoutPolicy;
use nsxlsx_core::SnapshotTree;
use nsxlsx_core_types::RunContext;
use nsxlsx_store::errors::Result;
use nsxlsx_store::SheetStore;

use crate::config::{Configurable, Configuration, OPT_STORE_PATH};
use crate::persistence::{OutputReport, PersistenceEngine};
use nsxlsx_core::errors::{ExError, ExErrorKind};

/// Sink for snapshots
pub trait Outputter: Configurable {
    /// Persist one snapshot
    fn output(&self, tree: &SnapshotTree, ctx: &RunContext) -> Result<OutputReport>;
}

/// Appends each snapshot as one new row per sheet of a store
#[derive(Debug, Clone, Default)]
pub struct AppendingOutputter {
    layouts: LayoutPolicy,
    engine: Option<PersistenceEngine>,
}

impl AppendingOutputter {
    pub fn new(layouts: LayoutPolicy) -> Self {
        Self {
            layouts,
            engine: None,
        }
    }

    pub fn engine(&self) -> Option<&PersistenceEngine> {
        self.engine.as_ref()
    }
}

impl Configurable for AppendingOutputter {
    fn configure(&mut self, config: &Configuration) -> Result<()> {
        let store = SheetStore::new(config.require(OPT_STORE_PATH)?)?;
        self.engine = Some(PersistenceEngine::new(store, self.layouts.clone()));
        Ok(())
    }
}

impl Outputter for AppendingOutputter {
    fn output(&self, tree: &SnapshotTree, ctx: &RunContext) -> Result<OutputReport> {
        let engine = self.engine.as_ref().ok_or_else(|| {
            ExError::new(ExErrorKind::Configuration)
                .with_op("output")
                .with_message("Outputter used before configure")
        })?;
        engine.output(tree, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsxlsx_store::StoreFormat;

    #[test]
    fn test_configure_picks_format_from_path() {
        let mut outputter = AppendingOutputter::default();
        outputter
            .configure(&Configuration::new().with(OPT_STORE_PATH, "stats.xlsx"))
            .unwrap();

        let engine = outputter.engine().unwrap();
        assert_eq!(engine.store().format(), StoreFormat::Xlsx);
    }

    #[test]
    fn test_configure_errors() {
        let mut outputter = AppendingOutputter::default();

        let missing = outputter.configure(&Configuration::new()).unwrap_err();
        let unsupported = outputter
            .configure(&Configuration::new().with(OPT_STORE_PATH, "stats.ods"))
            .unwrap_err();

        assert_eq!(missing.kind(), ExErrorKind::Configuration);
        assert_eq!(unsupported.kind(), ExErrorKind::Configuration);
    }

    #[test]
    fn test_output_before_configure() {
        let outputter = AppendingOutputter::default();
        let tree = SnapshotTree::new();

        let err = outputter.output(&tree, &RunContext::new()).unwrap_err();

        assert_eq!(err.op(), Some("output"));
    }
}
