//! XLSX codec
//!
//! Reads with calamine and writes with rust_xlsxwriter. Every cell is
//! written as a string so values round-trip exactly as the provider
//! formatted them.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use nsxlsx_core::grid::{CellAddress, Sheet, Workbook};

use super::SheetCodec;
use crate::errors::{decode_error, encode_error, sheet_encode_error, Result};

/// Office Open XML spreadsheet codec
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxCodec;

fn cell_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl SheetCodec for XlsxCodec {
    fn load(&self, path: &Path) -> Result<Workbook> {
        let mut source: Xlsx<_> = open_workbook(path).map_err(|e| decode_error(path, e))?;
        let mut workbook = Workbook::new();

        for name in source.sheet_names() {
            let range = source
                .worksheet_range(&name)
                .map_err(|e| decode_error(path, e).with_sheet(name.as_str()))?;
            let mut sheet = Sheet::new(name.as_str());
            if let Some((row0, col0)) = range.start() {
                for (row, col, data) in range.used_cells() {
                    let text = cell_text(data);
                    if !text.is_empty() {
                        let address =
                            CellAddress::new(row0 as usize + row, col0 as usize + col);
                        sheet.set_cell(address, text);
                    }
                }
            }
            tracing::debug!(sheet = %name, cells = sheet.cells().count(), "loaded sheet");
            workbook.push_sheet(sheet);
        }

        Ok(workbook)
    }

    fn encode(&self, workbook: &Workbook) -> Result<Vec<u8>> {
        let mut output = rust_xlsxwriter::Workbook::new();

        for sheet in workbook.sheets() {
            let worksheet = output.add_worksheet();
            worksheet
                .set_name(sheet.name())
                .map_err(|e| sheet_encode_error(sheet.name(), e))?;
            for (address, text) in sheet.cells() {
                let row = u32::try_from(address.row)
                    .map_err(|e| sheet_encode_error(sheet.name(), e))?;
                let col = u16::try_from(address.col)
                    .map_err(|e| sheet_encode_error(sheet.name(), e))?;
                worksheet
                    .write_string(row, col, text)
                    .map_err(|e| sheet_encode_error(sheet.name(), e))?;
            }
        }

        output.save_to_buffer().map_err(encode_error)
    }
}
