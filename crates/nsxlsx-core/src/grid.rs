//! In-memory workbook model
//!
//! A workbook is an ordered list of named sheets; a sheet is a grid of string
//! cells addressed by 0-indexed `(row, col)`. Codecs in the store crate load
//! into and save from this model; the reconciliation algorithms only ever see
//! this model.

use serde::{Deserialize, Serialize};

/// Row reserved for an optional sheet title, never managed by resolution
pub const TITLE_ROW: usize = 0;
/// Row holding the field name of each column
pub const HEADER_ROW: usize = 1;
/// First row holding snapshot values
pub const FIRST_DATA_ROW: usize = 2;

/// 0-indexed cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for CellAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}C{}", self.row, self.col)
    }
}

/// True when a cell's content counts as empty
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}

/// One named table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    name: String,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content at `address`, `""` outside the populated area
    pub fn cell(&self, address: CellAddress) -> &str {
        self.rows
            .get(address.row)
            .and_then(|row| row.get(address.col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_blank(&self, address: CellAddress) -> bool {
        is_blank(self.cell(address))
    }

    /// Header text of a column
    pub fn header(&self, col: usize) -> &str {
        self.cell(CellAddress::new(HEADER_ROW, col))
    }

    /// Overwrite one cell, growing the grid as needed
    pub fn set_cell(&mut self, address: CellAddress, content: impl Into<String>) {
        if self.rows.len() <= address.row {
            self.rows.resize_with(address.row + 1, Vec::new);
        }
        let row = &mut self.rows[address.row];
        if row.len() <= address.col {
            row.resize_with(address.col + 1, String::new);
        }
        row[address.col] = content.into();
    }

    /// Number of rows up to and including the last row with any content
    pub fn row_count(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|c| !is_blank(c)))
            .map_or(0, |last| last + 1)
    }

    /// Number of columns up to and including the right-most non-blank cell
    /// in any row
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|row| row.iter().rposition(|c| !is_blank(c)))
            .map(|last| last + 1)
            .max()
            .unwrap_or(0)
    }

    /// Header texts for columns `0..column_count()`
    pub fn header_row(&self) -> Vec<&str> {
        (0..self.column_count()).map(|col| self.header(col)).collect()
    }

    /// True when every cell of `row` in `0..column_count()` is blank
    pub fn is_row_blank(&self, row: usize) -> bool {
        match self.rows.get(row) {
            Some(cells) => cells.iter().all(|c| is_blank(c)),
            None => true,
        }
    }

    /// Values of one row, padded to `column_count()`
    pub fn row_values(&self, row: usize) -> Vec<&str> {
        (0..self.column_count())
            .map(|col| self.cell(CellAddress::new(row, col)))
            .collect()
    }

    /// Non-blank cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &str)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, content)| !is_blank(content))
                .map(move |(c, content)| (CellAddress::new(r, c), content.as_str()))
        })
    }

    /// True when no cell holds content
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// Ordered collection of sheets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Append a sheet, replacing any existing sheet with the same name
    pub fn push_sheet(&mut self, sheet: Sheet) {
        match self.sheets.iter().position(|s| s.name == sheet.name) {
            Some(index) => self.sheets[index] = sheet,
            None => self.sheets.push(sheet),
        }
    }

    /// Existing sheet with `name`, or a new empty one appended at the end
    pub fn get_or_add_sheet(&mut self, name: &str) -> &mut Sheet {
        let index = match self.sheets.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sheets.push(Sheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[index]
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
