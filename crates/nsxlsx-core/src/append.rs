//! Row appending
//!
//! Data rows grow downward from [`FIRST_DATA_ROW`]. A row is only ever
//! written when it is blank across every column of the sheet, so rows from
//! earlier runs are never overwritten.

use crate::errors::Result;
use crate::grid::{CellAddress, Sheet, FIRST_DATA_ROW};
use crate::policy::{apply_write, CellWrite};

/// First data row that is blank in every column of `sheet`
pub fn next_data_row(sheet: &Sheet) -> usize {
    let last = sheet.row_count().max(FIRST_DATA_ROW);
    (FIRST_DATA_ROW..last)
        .find(|&row| sheet.is_row_blank(row))
        .unwrap_or(last)
}

/// Write one row of `(column, value)` pairs at `next_data_row(sheet)`
///
/// Returns the row written, or `None` when `values` is empty and no row was
/// taken. Each value goes through `IncrementRowUntilEmpty`, which lands on
/// the target row because the row is blank in every column.
pub fn append(sheet: &mut Sheet, values: &[(usize, String)]) -> Result<Option<usize>> {
    if values.is_empty() {
        return Ok(None);
    }
    let row = next_data_row(sheet);
    for (col, value) in values {
        let write = CellWrite::data(CellAddress::new(row, *col), value.clone());
        apply_write(sheet, &write)?;
    }
    Ok(Some(row))
}
