//! Persistence engine
//!
//! Drives one `output` operation:
//! 1. Open the store as `StoreHandle::New` or `StoreHandle::Existing`
//! 2. Reconcile the snapshot into an owned working copy
//! 3. Save the working copy once, atomically
//!
//! A failure in step 2 returns before step 3, so the file on disk is never
//! touched by a rejected snapshot.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for `output`:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

use std::path::PathBuf;

use nsxlsx_core::layout::LayoutPolicy;
use nsxlsx_core::reconcile::{reconcile, OutputMode, SheetOutcome};
use nsxlsx_core::{log_op_end, log_op_error, log_op_start, SnapshotTree};
use nsxlsx_core_types::RunContext;
use nsxlsx_store::errors::Result;
use nsxlsx_store::SheetStore;

/// Result of a successful `output`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputReport {
    pub run_id: String,
    pub store_path: PathBuf,
    pub mode: OutputMode,
    pub sheets: Vec<SheetOutcome>,
}

impl OutputReport {
    /// Outcome for one sheet by name
    pub fn sheet(&self, name: &str) -> Option<&SheetOutcome> {
        self.sheets.iter().find(|s| s.sheet == name)
    }
}

/// Store plus the layouts applied to it
#[derive(Debug, Clone)]
pub struct PersistenceEngine {
    store: SheetStore,
    layouts: LayoutPolicy,
}

impl PersistenceEngine {
    pub fn new(store: SheetStore, layouts: LayoutPolicy) -> Self {
        Self { store, layouts }
    }

    pub fn store(&self) -> &SheetStore {
        &self.store
    }

    /// Append `tree` to the store, creating it if absent
    ///
    /// ## Errors
    ///
    /// - `ERR_INVALID_INPUT`: Snapshot is not sheet/field shaped
    /// - `ERR_SCHEMA_MISMATCH`: Header row disagrees with the snapshot
    /// - `ERR_SCHEMA_EXHAUSTED`: No column available for a field
    /// - `ERR_PERSISTENCE`: Store cannot be decoded or written
    pub fn output(&self, tree: &SnapshotTree, ctx: &RunContext) -> Result<OutputReport> {
        let store_path = self.store.path().display().to_string();
        log_op_start!(
            "output",
            run_id = ctx.run_id.as_str(),
            store_path = store_path.as_str(),
            store_format = self.store.format().as_str()
        );
        let start = std::time::Instant::now();

        let report = self.output_impl(tree, ctx).map_err(|e| {
            log_op_error!(
                "output",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = ctx.run_id.as_str()
            );
            e
        })?;

        log_op_end!(
            "output",
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = ctx.run_id.as_str(),
            mode = report.mode.as_str(),
            sheet_count = report.sheets.len()
        );

        Ok(report)
    }

    fn output_impl(&self, tree: &SnapshotTree, ctx: &RunContext) -> Result<OutputReport> {
        let handle = self.store.open()?;
        let reconciled = reconcile(handle, tree, &self.layouts)?;

        for outcome in &reconciled.sheets {
            tracing::debug!(
                sheet = outcome.sheet.as_str(),
                row = ?outcome.data_row,
                new_columns = outcome.new_columns.len(),
                "sheet reconciled"
            );
        }
        tracing::debug!(cell_count = reconciled.cell_count(), "saving store");

        self.store.save(&reconciled.workbook)?;

        Ok(OutputReport {
            run_id: ctx.run_id.as_str().to_string(),
            store_path: self.store.path().to_path_buf(),
            mode: reconciled.mode,
            sheets: reconciled.sheets,
        })
    }
}
