//! Column resolution
//!
//! Maps a field name to a stable column index of a sheet. The header row is
//! the schema: a field whose normalized name matches an existing header
//! always lands in that header's column, and a new field claims the
//! left-most blank header cell. Claims made earlier in the same batch are
//! tracked so two new fields never collide on one blank column before the
//! headers are written.

use std::collections::BTreeMap;

use crate::errors::{NsxError, Result};
use crate::grid::{is_blank, Sheet};

/// Comparison form of a header: word characters only, uppercased
///
/// Display text is never rewritten; this is used for matching only.
pub fn normalize_header(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_uppercase)
        .collect()
}

/// True when two non-blank headers name the same field
///
/// Headers made entirely of punctuation fall back to trimmed equality so
/// they do not all collapse onto each other.
pub fn headers_match(a: &str, b: &str) -> bool {
    if is_blank(a) || is_blank(b) {
        return false;
    }
    let (na, nb) = (normalize_header(a), normalize_header(b));
    if na.is_empty() && nb.is_empty() {
        a.trim() == b.trim()
    } else {
        na == nb
    }
}

/// Where a field was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Header already present in the sheet or claimed earlier in the batch
    Existing(usize),
    /// Blank column newly claimed for the field
    Claimed(usize),
}

impl Resolution {
    pub fn column(self) -> usize {
        match self {
            Resolution::Existing(col) | Resolution::Claimed(col) => col,
        }
    }

    pub fn is_claimed(self) -> bool {
        matches!(self, Resolution::Claimed(_))
    }
}

/// Resolves the columns of one write batch against a sheet's header row
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    sheet: String,
    headers: Vec<String>,
    claims: BTreeMap<usize, String>,
    bound: usize,
}

impl ColumnResolver {
    /// Snapshot the header row of `sheet` for a batch of `batch_size` fields
    pub fn new(sheet: &Sheet, batch_size: usize) -> Self {
        let headers: Vec<String> = sheet
            .header_row()
            .into_iter()
            .map(str::to_string)
            .collect();
        let bound = headers.len() + batch_size;
        Self {
            sheet: sheet.name().to_string(),
            headers,
            claims: BTreeMap::new(),
            bound,
        }
    }

    /// Exclusive upper limit of the column scan
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Columns claimed so far, with the header text recorded for each
    pub fn claims(&self) -> &BTreeMap<usize, String> {
        &self.claims
    }

    /// Header as seen by this batch: the sheet's text, else the claimed text
    fn effective_header(&self, col: usize) -> Option<&str> {
        match self.headers.get(col) {
            Some(text) if !is_blank(text) => Some(text.as_str()),
            _ => self.claims.get(&col).map(String::as_str),
        }
    }

    /// Pin `name` to `col` for the rest of the batch
    ///
    /// Used for fixed layout columns whose header is verified separately.
    pub fn reserve(&mut self, col: usize, name: &str) {
        let has_header = matches!(self.headers.get(col), Some(text) if !is_blank(text));
        if !has_header {
            self.claims.insert(col, name.to_string());
        }
        if col >= self.bound {
            self.bound = col + 1;
        }
    }

    /// Column for `field`, claiming a blank one when no header matches
    pub fn resolve(&mut self, field: &str) -> Result<Resolution> {
        if let Some(col) = (0..self.bound).find(|&col| {
            self.effective_header(col)
                .is_some_and(|header| headers_match(header, field))
        }) {
            return Ok(Resolution::Existing(col));
        }

        let free = (0..self.bound).find(|&col| self.effective_header(col).is_none());
        match free {
            Some(col) => {
                tracing::debug!(sheet = %self.sheet, field, column = col, "claimed column");
                self.claims.insert(col, field.to_string());
                Ok(Resolution::Claimed(col))
            }
            None => Err(NsxError::SchemaExhausted {
                sheet: self.sheet.clone(),
                field: field.to_string(),
                bound: self.bound,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellAddress;

    fn sheet_with_headers(headers: &[&str]) -> Sheet {
        let mut sheet = Sheet::new("Economy");
        for (col, header) in headers.iter().enumerate() {
            sheet.set_cell(CellAddress::new(1, col), *header);
        }
        sheet
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Ave. wage"), "AVEWAGE");
        assert_eq!(normalize_header("GDP (billion)"), "GDPBILLION");
        assert_eq!(normalize_header("state_owned"), "STATE_OWNED");
    }

    #[test]
    fn test_headers_match_rules() {
        assert!(headers_match("Ave. wage", "AVE WAGE"));
        assert!(!headers_match("Ave. wage", "Wage"));
        assert!(!headers_match("", ""));
        assert!(!headers_match("%", "#"));
        assert!(headers_match("%", " % "));
    }

    #[test]
    fn test_resolve_matches_existing_header() {
        let sheet = sheet_with_headers(&["Timestamp", "GDP", "Tax"]);
        let mut resolver = ColumnResolver::new(&sheet, 1);

        assert_eq!(resolver.resolve("gdp").unwrap(), Resolution::Existing(1));
    }

    #[test]
    fn test_resolve_claims_first_blank() {
        let sheet = sheet_with_headers(&["Timestamp", "", "GDP"]);
        let mut resolver = ColumnResolver::new(&sheet, 2);

        assert_eq!(resolver.resolve("Tax").unwrap(), Resolution::Claimed(1));
        assert_eq!(resolver.resolve("Wage").unwrap(), Resolution::Claimed(3));
        assert_eq!(resolver.claims().get(&1).map(String::as_str), Some("Tax"));
    }

    #[test]
    fn test_resolve_prefers_match_over_earlier_blank() {
        let sheet = sheet_with_headers(&["Timestamp", "", "GDP"]);
        let mut resolver = ColumnResolver::new(&sheet, 1);

        assert_eq!(resolver.resolve("GDP").unwrap(), Resolution::Existing(2));
    }

    #[test]
    fn test_claimed_column_matches_later_in_batch() {
        let sheet = Sheet::new("Economy");
        let mut resolver = ColumnResolver::new(&sheet, 2);

        assert_eq!(resolver.resolve("Tax").unwrap(), Resolution::Claimed(0));
        assert_eq!(resolver.resolve("TAX").unwrap(), Resolution::Existing(0));
    }

    #[test]
    fn test_reserve_blocks_claim() {
        let sheet = Sheet::new("Economy");
        let mut resolver = ColumnResolver::new(&sheet, 2);
        resolver.reserve(0, "Timestamp");

        assert_eq!(resolver.resolve("GDP").unwrap(), Resolution::Claimed(1));
        assert_eq!(resolver.resolve("Timestamp").unwrap(), Resolution::Existing(0));
    }

    #[test]
    fn test_resolve_fails_past_bound() {
        let sheet = sheet_with_headers(&["A", "B"]);
        let mut resolver = ColumnResolver::new(&sheet, 1);

        resolver.resolve("C").unwrap();
        let err = resolver.resolve("D").unwrap_err();

        assert_eq!(
            err,
            NsxError::SchemaExhausted {
                sheet: "Economy".to_string(),
                field: "D".to_string(),
                bound: 3,
            }
        );
    }
}
