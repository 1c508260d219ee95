//! Two-mode reconciliation of a snapshot into a workbook
//!
//! `StoreHandle::New` yields `OutputMode::Created`, `StoreHandle::Existing`
//! yields `OutputMode::Appended`. Both go through the same per-sheet
//! pipeline:
//!
//! 1. Verify pinned layout headers (`StopIfNotEqual`)
//! 2. Resolve every field to a column (`ColumnResolver`)
//! 3. Verify or extend the header row (`StopIfNotEqual`)
//! 4. Append one data row (`IncrementRowUntilEmpty`)
//!
//! Every sheet is planned against the working copy before anything is
//! written to it, and the working copy is owned by this function: an error
//! in any sheet drops it, so the caller has nothing to save.

use std::collections::BTreeMap;

use crate::append::append;
use crate::errors::{NsxError, Result};
use crate::grid::{is_blank, CellAddress, Sheet, Workbook, HEADER_ROW, TITLE_ROW};
use crate::layout::{LayoutPolicy, SheetLayout};
use crate::policy::{apply_write, plan_write, CellPolicy, CellWrite};
use crate::resolve::ColumnResolver;
use crate::snapshot::{NodeKind, NodeRef, SnapshotTree, TIMESTAMP_FIELD};

/// Store state as found on open
#[derive(Debug, Clone, PartialEq)]
pub enum StoreHandle {
    /// Nothing at the store path yet
    New,
    /// Loaded contents of an existing store
    Existing(Workbook),
}

/// Which of the two modes a successful run took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Created,
    Appended,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputMode::Created => "created",
            OutputMode::Appended => "appended",
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOutcome {
    pub sheet: String,
    /// Row the snapshot values were written to; `None` when every value was
    /// blank
    pub data_row: Option<usize>,
    /// Columns whose header was written in this run
    pub new_columns: Vec<(usize, String)>,
    pub sheet_created: bool,
}

/// Successful reconciliation, ready to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub workbook: Workbook,
    pub mode: OutputMode,
    pub sheets: Vec<SheetOutcome>,
}

impl Reconciled {
    pub fn cell_count(&self) -> usize {
        self.workbook.sheets().iter().map(|s| s.cells().count()).sum()
    }
}

/// Staged writes for one sheet
#[derive(Debug)]
struct SheetPlan {
    headers: Vec<CellWrite>,
    values: Vec<(usize, String)>,
}

/// Check that `tree` has the sheet/field shape
///
/// # Errors
///
/// `InvalidSnapshot` for an empty snapshot, a field outside any sheet, or a
/// group nested below a sheet.
pub fn validate_snapshot(tree: &SnapshotTree) -> Result<()> {
    let root = tree.root();
    if root.children().next().is_none() {
        return Err(NsxError::InvalidSnapshot {
            reason: "snapshot has no sheets".to_string(),
        });
    }
    for sheet in root.children() {
        if let NodeKind::Leaf(_) = sheet.kind() {
            return Err(NsxError::InvalidSnapshot {
                reason: format!("field '{}' is not inside a sheet", sheet.key()),
            });
        }
        for field in sheet.children() {
            if field.kind() == NodeKind::Group {
                return Err(NsxError::InvalidSnapshot {
                    reason: format!("nested group at '{}'", field.path().join("/")),
                });
            }
        }
    }
    Ok(())
}

/// Fields of a sheet in write order: the timestamp first, then insertion order
fn ordered_fields<'a>(sheet: NodeRef<'a>) -> Vec<(&'a str, &'a str)> {
    let mut fields: Vec<(&str, &str)> = sheet
        .children()
        .map(|field| (field.key(), field.value().unwrap_or("")))
        .collect();
    if let Some(index) = fields.iter().position(|(key, _)| *key == TIMESTAMP_FIELD) {
        let timestamp = fields.remove(index);
        fields.insert(0, timestamp);
    }
    fields
}

/// Plan every write for one sheet without touching it
fn plan_sheet(
    sheet: &Sheet,
    fields: &[(&str, &str)],
    layout: &SheetLayout,
    created: bool,
) -> Result<SheetPlan> {
    let mut headers = Vec::new();

    if let Some(title) = &layout.title {
        let policy = if created {
            CellPolicy::StopIfNotEqual
        } else {
            CellPolicy::Skip
        };
        headers.push(CellWrite::new(
            CellAddress::new(TITLE_ROW, 0),
            title.as_str(),
            policy,
        ));
    }

    let mut resolver = ColumnResolver::new(sheet, layout.columns.len() + fields.len());
    for (col, name) in layout.columns.iter().enumerate() {
        let write = CellWrite::header(CellAddress::new(HEADER_ROW, col), name.as_str());
        plan_write(sheet, &write)?;
        resolver.reserve(col, name);
        headers.push(write);
    }

    let mut owners: BTreeMap<usize, &str> = BTreeMap::new();
    let mut values = Vec::with_capacity(fields.len());
    for &(field, value) in fields {
        let col = resolver.resolve(field)?.column();
        if let Some(first) = owners.insert(col, field) {
            return Err(NsxError::DuplicateField {
                sheet: sheet.name().to_string(),
                first: first.to_string(),
                second: field.to_string(),
                column: col,
            });
        }

        let write = CellWrite::header(CellAddress::new(HEADER_ROW, col), field);
        plan_write(sheet, &write)?;
        headers.push(write);

        if !is_blank(value) {
            values.push((col, value.to_string()));
        }
    }

    Ok(SheetPlan { headers, values })
}

/// Apply a verified plan, returning the data row and newly written headers
fn apply_plan(
    sheet: &mut Sheet,
    plan: SheetPlan,
) -> Result<(Option<usize>, Vec<(usize, String)>)> {
    let mut new_columns = Vec::new();
    for write in &plan.headers {
        let was_blank = sheet.is_blank(write.address);
        apply_write(sheet, write)?;
        if write.address.row == HEADER_ROW && was_blank && write.policy != CellPolicy::Skip {
            new_columns.push((write.address.col, write.content.clone()));
        }
    }
    let row = append(sheet, &plan.values)?;
    Ok((row, new_columns))
}

/// Write one snapshot row into every sheet of the store
///
/// # Errors
///
/// - `InvalidSnapshot` when the tree is not sheet/field shaped
/// - `SchemaMismatch` when an existing header disagrees with a pinned or
///   resolved field
/// - `SchemaExhausted` when no column can be found for a field
/// - `DuplicateField` when two fields of one sheet resolve to one column
///
/// On error nothing of the working copy is returned.
pub fn reconcile(
    handle: StoreHandle,
    tree: &SnapshotTree,
    layouts: &LayoutPolicy,
) -> Result<Reconciled> {
    validate_snapshot(tree)?;

    let (mut workbook, mode) = match handle {
        StoreHandle::New => (Workbook::new(), OutputMode::Created),
        StoreHandle::Existing(workbook) => (workbook, OutputMode::Appended),
    };

    let mut staged = Vec::new();
    for group in tree.root().children() {
        let fields = ordered_fields(group);
        if fields.is_empty() {
            tracing::warn!(sheet = group.key(), "skipping sheet with no fields");
            continue;
        }
        let name = group.key();
        let created = workbook.sheet(name).is_none();
        let layout = layouts.for_sheet(name);
        let plan = match workbook.sheet(name) {
            Some(sheet) => plan_sheet(sheet, &fields, layout, created)?,
            None => plan_sheet(&Sheet::new(name), &fields, layout, created)?,
        };
        tracing::debug!(
            sheet = name,
            header_writes = plan.headers.len(),
            values = plan.values.len(),
            "planned sheet"
        );
        staged.push((name, created, plan));
    }

    let mut sheets = Vec::with_capacity(staged.len());
    for (name, created, plan) in staged {
        let sheet = workbook.get_or_add_sheet(name);
        let (data_row, new_columns) = apply_plan(sheet, plan)?;
        sheets.push(SheetOutcome {
            sheet: name.to_string(),
            data_row,
            new_columns,
            sheet_created: created,
        });
    }

    Ok(Reconciled {
        workbook,
        mode,
        sheets,
    })
}
