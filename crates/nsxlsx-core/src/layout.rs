//! Fixed sheet layouts
//!
//! A layout pins leading columns of a sheet to known field names and
//! optionally gives the sheet a title. Pinned headers are written with
//! `StopIfNotEqual`, so a store whose header row disagrees with the layout is
//! rejected instead of silently drifting. The default layout pins nothing:
//! every field is found wherever its header sits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Layout of one sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Written at row 0, column 0 when the sheet is created
    #[serde(default)]
    pub title: Option<String>,
    /// Field names pinned to columns `0..columns.len()`
    #[serde(default)]
    pub columns: Vec<String>,
}

impl SheetLayout {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Layouts for every sheet, with a fallback for unnamed ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPolicy {
    #[serde(default)]
    pub default: SheetLayout,
    #[serde(default)]
    pub sheets: BTreeMap<String, SheetLayout>,
}

impl LayoutPolicy {
    pub fn for_sheet(&self, name: &str) -> &SheetLayout {
        self.sheets.get(name).unwrap_or(&self.default)
    }

    pub fn with_sheet(mut self, name: impl Into<String>, layout: SheetLayout) -> Self {
        self.sheets.insert(name.into(), layout);
        self
    }
}
