//! JSON grid codec

use std::fs;
use std::path::Path;

use nsxlsx_core::grid::Workbook;

use super::SheetCodec;
use crate::errors::{decode_error, encode_error, io_error, Result};

/// Stores the workbook grid as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl SheetCodec for JsonCodec {
    fn load(&self, path: &Path) -> Result<Workbook> {
        let bytes = fs::read(path).map_err(|e| io_error("read_store", e))?;
        serde_json::from_slice(&bytes).map_err(|e| decode_error(path, e))
    }

    fn encode(&self, workbook: &Workbook) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(workbook).map_err(encode_error)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsxlsx_core::errors::ExErrorKind;
    use nsxlsx_core::grid::CellAddress;
    use tempfile::TempDir;

    #[test]
    fn test_encode_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");
        let mut workbook = Workbook::new();
        workbook
            .get_or_add_sheet("Economy")
            .set_cell(CellAddress::new(1, 0), "Timestamp");

        fs::write(&path, JsonCodec.encode(&workbook).unwrap()).unwrap();
        let loaded = JsonCodec.load(&path).unwrap();

        assert_eq!(loaded, workbook);
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = JsonCodec.load(&path).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Persistence);
        assert_eq!(err.op(), Some("load_store"));
    }
}
