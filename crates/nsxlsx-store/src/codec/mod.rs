//! Store codecs
//!
//! A codec turns a file into a [`Workbook`] and a workbook into bytes. The
//! format is picked from the store path's extension; writing the bytes is
//! left to the caller so every format shares the same atomic save.

mod json;
mod xlsx;

use std::path::Path;

use nsxlsx_core::grid::Workbook;

use crate::errors::{unsupported_format, Result};

pub use json::JsonCodec;
pub use xlsx::XlsxCodec;

/// Read/encode contract shared by every store format
pub trait SheetCodec {
    /// Load an existing store file
    fn load(&self, path: &Path) -> Result<Workbook>;

    /// Serialize a workbook to the bytes of a store file
    fn encode(&self, workbook: &Workbook) -> Result<Vec<u8>>;
}

/// Closed set of supported store formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Xlsx,
    Json,
}

static XLSX_CODEC: XlsxCodec = XlsxCodec;
static JSON_CODEC: JsonCodec = JsonCodec;

impl StoreFormat {
    /// Format named by the path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx") => Ok(StoreFormat::Xlsx),
            Some("json") => Ok(StoreFormat::Json),
            _ => Err(unsupported_format(path)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StoreFormat::Xlsx => "xlsx",
            StoreFormat::Json => "json",
        }
    }

    pub fn codec(self) -> &'static dyn SheetCodec {
        match self {
            StoreFormat::Xlsx => &XLSX_CODEC,
            StoreFormat::Json => &JSON_CODEC,
        }
    }
}

impl std::fmt::Display for StoreFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
