use nsxlsx_core::{CellAddress, Sheet, SnapshotTree};

/// Build a snapshot from `(sheet, [(field, value)])` pairs in order
#[allow(dead_code)]
pub fn snapshot(sheets: &[(&str, &[(&str, &str)])]) -> SnapshotTree {
    let mut tree = SnapshotTree::new();
    for (sheet, fields) in sheets {
        let group = tree
            .add_or_get_child(SnapshotTree::ROOT, sheet)
            .expect("root is a group");
        for (key, value) in *fields {
            tree.insert_leaf(group, key, *value)
                .expect("sheet is a group");
        }
    }
    tree
}

/// Sheet with the given header row
#[allow(dead_code)]
pub fn sheet_with_headers(name: &str, headers: &[&str]) -> Sheet {
    let mut sheet = Sheet::new(name);
    for (col, header) in headers.iter().enumerate() {
        sheet.set_cell(CellAddress::new(1, col), *header);
    }
    sheet
}

/// Number of non-blank data rows below the header
#[allow(dead_code)]
pub fn data_row_count(sheet: &Sheet) -> usize {
    (2..sheet.row_count())
        .filter(|row| !sheet.is_row_blank(*row))
        .count()
}
