//! Property-based tests for column resolution and row appending.
//!
//! Uses proptest to check that the header row is a stable schema: the same
//! field always lands in the same column, and repeated runs only ever add
//! rows below the existing ones.

mod common;

use common::{data_row_count, snapshot};
use nsxlsx_core::grid::{CellAddress, Sheet};
use nsxlsx_core::resolve::{normalize_header, ColumnResolver};
use nsxlsx_core::{reconcile, LayoutPolicy, StoreHandle};
use proptest::prelude::*;

/// Field names that are distinct after normalization
fn distinct_fields(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z][a-z]{0,7}", 1..max).prop_map(|set| {
        let mut seen = std::collections::BTreeSet::new();
        set.into_iter()
            .filter(|name| name != "Timestamp" && seen.insert(normalize_header(name)))
            .collect()
    })
}

/// Header row of up to eight cells, some blank
fn header_row() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop_oneof!["", "[A-Z][a-z]{0,5}"], 0..8)
}

fn sheet_from(headers: &[String]) -> Sheet {
    let mut sheet = Sheet::new("Economy");
    for (col, header) in headers.iter().enumerate() {
        sheet.set_cell(CellAddress::new(1, col), header.as_str());
    }
    sheet
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Resolving against an unchanged header row is deterministic.
    #[test]
    fn resolution_is_idempotent(headers in header_row(), field in "[A-Z][a-z]{0,5}") {
        let sheet = sheet_from(&headers);

        let first = ColumnResolver::new(&sheet, 1).resolve(&field);
        let second = ColumnResolver::new(&sheet, 1).resolve(&field);

        prop_assert_eq!(first, second);
    }

    /// A field matching an existing header resolves to that header's column.
    #[test]
    fn existing_header_is_found(headers in header_row(), pick in any::<prop::sample::Index>()) {
        let named: Vec<(usize, &String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_empty())
            .collect();
        prop_assume!(!named.is_empty());

        let (_, field) = named[pick.index(named.len())];
        let sheet = sheet_from(&headers);
        let col = ColumnResolver::new(&sheet, 1)
            .resolve(field)
            .expect("matching header should resolve")
            .column();

        let expected = headers
            .iter()
            .position(|h| !h.is_empty() && normalize_header(h) == normalize_header(field));
        prop_assert_eq!(Some(col), expected);
    }

    /// N runs produce N data rows and never rewrite an earlier row.
    #[test]
    fn append_only_growth(fields in distinct_fields(6), runs in 1usize..6) {
        prop_assume!(!fields.is_empty());
        let layouts = LayoutPolicy::default();
        let mut handle = StoreHandle::New;
        let mut history: Vec<Vec<String>> = Vec::new();

        for run in 0..runs {
            let timestamp = format!("t{}", run);
            let values: Vec<(String, String)> = fields
                .iter()
                .map(|f| (f.clone(), format!("{}-{}", f, run)))
                .collect();
            let mut pairs: Vec<(&str, &str)> = vec![("Timestamp", timestamp.as_str())];
            pairs.extend(values.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            let tree = snapshot(&[("Economy", pairs.as_slice())]);

            let out = reconcile(handle, &tree, &layouts).expect("run should succeed");
            let sheet = out.workbook.sheet("Economy").expect("Economy should exist");

            for (row, recorded) in history.iter().enumerate() {
                let current: Vec<String> = sheet
                    .row_values(row + 2)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                prop_assert_eq!(&current, recorded);
            }
            history.push(
                sheet
                    .row_values(run + 2)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            );
            prop_assert_eq!(data_row_count(sheet), run + 1);
            handle = StoreHandle::Existing(out.workbook);
        }
    }
}
