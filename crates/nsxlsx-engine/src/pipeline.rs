//! One acquisition-to-output run
//!
//! Both steps are logged as engine operations (`acquire`, `output`) sharing
//! the run's `run_id`.

use nsxlsx_core::{log_op_end, log_op_error, log_op_start, SnapshotTree};
use nsxlsx_core_types::RunContext;
use nsxlsx_store::errors::Result;

use crate::outputter::Outputter;
use crate::persistence::OutputReport;
use crate::provider::Provider;

/// Acquire one snapshot from `provider`
pub fn acquire(provider: &dyn Provider, ctx: &RunContext) -> Result<SnapshotTree> {
    log_op_start!(
        "acquire",
        run_id = ctx.run_id.as_str(),
        source = ctx.source_identifier.as_deref().unwrap_or("")
    );
    let start = std::time::Instant::now();

    let tree = provider.get().map_err(|e| {
        log_op_error!(
            "acquire",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = ctx.run_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "acquire",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = ctx.run_id.as_str(),
        sheet_count = tree.root().children().count()
    );

    Ok(tree)
}

/// Acquire from `provider` and hand the snapshot to `outputter`
pub fn run_once(
    provider: &dyn Provider,
    outputter: &dyn Outputter,
    ctx: &RunContext,
) -> Result<OutputReport> {
    let tree = acquire(provider, ctx)?;
    outputter.output(&tree, ctx)
}
