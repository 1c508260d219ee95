//! Per-cell reconciliation policies
//!
//! Every write into a sheet is described by a [`CellWrite`]: a candidate
//! address, the content, and the [`CellPolicy`] deciding what happens when
//! the candidate cell already holds something.

use crate::errors::{NsxError, Result};
use crate::grid::{is_blank, CellAddress, Sheet};
use crate::resolve::headers_match;

/// Behaviour when a candidate cell is not blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPolicy {
    /// Existing content must match under header normalization
    StopIfNotEqual,
    /// Move down from the candidate row to the first blank cell
    IncrementRowUntilEmpty,
    /// Never written nor checked
    Skip,
}

/// Transient write descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub address: CellAddress,
    pub content: String,
    pub policy: CellPolicy,
}

impl CellWrite {
    pub fn new(address: CellAddress, content: impl Into<String>, policy: CellPolicy) -> Self {
        Self {
            address,
            content: content.into(),
            policy,
        }
    }

    pub fn header(address: CellAddress, content: impl Into<String>) -> Self {
        Self::new(address, content, CellPolicy::StopIfNotEqual)
    }

    pub fn data(address: CellAddress, content: impl Into<String>) -> Self {
        Self::new(address, content, CellPolicy::IncrementRowUntilEmpty)
    }
}

/// Result of applying one write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content stored at the given address
    Written(CellAddress),
    /// Existing content already matched
    Unchanged(CellAddress),
    /// Policy was `Skip`
    Skipped,
}

/// Decide where `write` lands without touching the sheet
///
/// Returns `None` for writes that leave the sheet as it is.
pub fn plan_write(sheet: &Sheet, write: &CellWrite) -> Result<Option<CellAddress>> {
    match write.policy {
        CellPolicy::Skip => Ok(None),
        CellPolicy::StopIfNotEqual => {
            let existing = sheet.cell(write.address);
            if is_blank(existing) {
                Ok(Some(write.address))
            } else if headers_match(existing, &write.content) {
                Ok(None)
            } else {
                Err(NsxError::SchemaMismatch {
                    sheet: sheet.name().to_string(),
                    row: write.address.row,
                    column: write.address.col,
                    expected: write.content.clone(),
                    found: existing.to_string(),
                })
            }
        }
        CellPolicy::IncrementRowUntilEmpty => {
            let mut address = write.address;
            while !sheet.is_blank(address) {
                address.row += 1;
            }
            Ok(Some(address))
        }
    }
}

/// Apply one write to `sheet` under its policy
pub fn apply_write(sheet: &mut Sheet, write: &CellWrite) -> Result<WriteOutcome> {
    if write.policy == CellPolicy::Skip {
        return Ok(WriteOutcome::Skipped);
    }
    match plan_write(sheet, write)? {
        Some(address) => {
            sheet.set_cell(address, write.content.clone());
            Ok(WriteOutcome::Written(address))
        }
        None => Ok(WriteOutcome::Unchanged(write.address)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_header(header: &str) -> Sheet {
        let mut sheet = Sheet::new("Economy");
        sheet.set_cell(CellAddress::new(1, 0), header);
        sheet
    }

    #[test]
    fn test_stop_if_not_equal_writes_blank() {
        let mut sheet = Sheet::new("Economy");
        let write = CellWrite::header(CellAddress::new(1, 0), "Timestamp");

        let outcome = apply_write(&mut sheet, &write).unwrap();

        assert_eq!(outcome, WriteOutcome::Written(CellAddress::new(1, 0)));
        assert_eq!(sheet.header(0), "Timestamp");
    }

    #[test]
    fn test_stop_if_not_equal_accepts_normalized_match() {
        let mut sheet = sheet_with_header("Ave. wage");
        let write = CellWrite::header(CellAddress::new(1, 0), "AVE WAGE");

        let outcome = apply_write(&mut sheet, &write).unwrap();

        assert_eq!(outcome, WriteOutcome::Unchanged(CellAddress::new(1, 0)));
        assert_eq!(sheet.header(0), "Ave. wage");
    }

    #[test]
    fn test_stop_if_not_equal_rejects_mismatch() {
        let mut sheet = sheet_with_header("Date");
        let write = CellWrite::header(CellAddress::new(1, 0), "Timestamp");

        let err = apply_write(&mut sheet, &write).unwrap_err();

        assert!(matches!(
            err,
            NsxError::SchemaMismatch { row: 1, column: 0, .. }
        ));
        assert_eq!(sheet.header(0), "Date");
    }

    #[test]
    fn test_increment_row_until_empty_moves_down() {
        let mut sheet = Sheet::new("Economy");
        sheet.set_cell(CellAddress::new(2, 0), "a");
        sheet.set_cell(CellAddress::new(3, 0), "b");

        let write = CellWrite::data(CellAddress::new(2, 0), "c");
        let outcome = apply_write(&mut sheet, &write).unwrap();

        assert_eq!(outcome, WriteOutcome::Written(CellAddress::new(4, 0)));
        assert_eq!(sheet.cell(CellAddress::new(2, 0)), "a");
    }

    #[test]
    fn test_skip_never_touches_sheet() {
        let mut sheet = sheet_with_header("Anything");
        let write = CellWrite::new(CellAddress::new(1, 0), "Other", CellPolicy::Skip);

        assert_eq!(apply_write(&mut sheet, &write).unwrap(), WriteOutcome::Skipped);
        assert_eq!(plan_write(&sheet, &write).unwrap(), None);
        assert_eq!(sheet.header(0), "Anything");
    }
}
