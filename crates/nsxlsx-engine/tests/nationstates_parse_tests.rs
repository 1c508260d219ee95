//! NationStates response parsing tests
//!
//! Parse a recorded API response without touching the network.

use nsxlsx_core::errors::ExErrorKind;
use nsxlsx_core::logging_facility::test_capture::init_test_capture;
use nsxlsx_core::{reconcile, LayoutPolicy, StoreHandle};
use nsxlsx_engine::provider::parse_nation;

const TESTLANDIA: &str = include_str!("fixtures/testlandia.xml");
const TIMESTAMP: &str = "2024-01-01T00:00:00Z";

fn field<'a>(tree: &'a nsxlsx_core::SnapshotTree, sheet: &str, key: &str) -> Option<&'a str> {
    tree.root().child(sheet)?.child(key)?.value()
}

#[test]
fn test_parse_builds_four_sheets_in_order() {
    let tree = parse_nation(TESTLANDIA, TIMESTAMP).unwrap();

    let sheets: Vec<_> = tree.root().children().map(|s| s.key()).collect();
    assert_eq!(
        sheets,
        vec!["Economy", "Government expenditure", "Rights", "Causes of death"]
    );
    for sheet in &sheets {
        assert_eq!(field(&tree, sheet, "Timestamp"), Some(TIMESTAMP));
    }
}

#[test]
fn test_parse_derives_billions() {
    let tree = parse_nation(TESTLANDIA, TIMESTAMP).unwrap();

    assert_eq!(field(&tree, "Economy", "GDP (billion)"), Some("1234.568"));
    assert_eq!(
        field(&tree, "Government expenditure", "Expenditure (billion)"),
        Some("314.815")
    );
    assert_eq!(field(&tree, "Government expenditure", "% of GDP"), Some("25.5"));
}

#[test]
fn test_parse_maps_sectors_and_scores() {
    let tree = parse_nation(TESTLANDIA, TIMESTAMP).unwrap();

    assert_eq!(field(&tree, "Economy", "Ave. wage"), Some("42317"));
    assert_eq!(field(&tree, "Economy", "State-owned Industry"), Some("13.25"));
    assert_eq!(field(&tree, "Economy", "Private Industry"), Some("60.00"));
    assert_eq!(field(&tree, "Rights", "Political Freedom"), Some("58"));
    assert_eq!(
        field(&tree, "Government expenditure", "International aid"),
        Some("2.40")
    );
}

#[test]
fn test_parse_keeps_causes_of_death_in_response_order() {
    let tree = parse_nation(TESTLANDIA, TIMESTAMP).unwrap();

    let causes: Vec<_> = tree
        .root()
        .child("Causes of death")
        .unwrap()
        .children()
        .map(|c| c.key())
        .collect();
    assert_eq!(
        causes,
        vec![
            "Old Age",
            "Heart Disease",
            "Murder",
            "Cancer",
            "Acts of God",
            "Exposure",
            "Timestamp"
        ]
    );
}

#[test]
fn test_non_numeric_gdp_is_acquisition_error() {
    let xml = TESTLANDIA.replace("<GDP>1234567890123</GDP>", "<GDP>lots</GDP>");

    let err = parse_nation(&xml, TIMESTAMP).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Acquisition);
    assert!(err.message().contains("GDP"));
}

#[test]
fn test_malformed_xml_is_acquisition_error() {
    let err = parse_nation("<NATION><GDP>1</INCOME></NATION>", TIMESTAMP).unwrap_err();

    assert_eq!(err.code(), "ERR_ACQUISITION");
}

#[test]
fn test_parsed_snapshot_reconciles_with_timestamp_first() {
    let tree = parse_nation(TESTLANDIA, TIMESTAMP).unwrap();

    let out = reconcile(StoreHandle::New, &tree, &LayoutPolicy::default()).unwrap();

    let rights = out.workbook.sheet("Rights").unwrap();
    assert_eq!(
        rights.header_row(),
        vec!["Timestamp", "Civil Rights", "Economy", "Political Freedom"]
    );
    assert_eq!(rights.row_values(2), vec![TIMESTAMP, "67", "72", "58"]);
}

#[test]
fn test_missing_element_leaves_field_blank() {
    let capture = init_test_capture();
    let xml = TESTLANDIA.replace("<WELFARE>15.00</WELFARE>", "");

    let tree = parse_nation(&xml, TIMESTAMP).unwrap();

    assert_eq!(field(&tree, "Government expenditure", "Welfare"), Some(""));
    assert_eq!(
        field(&tree, "Government expenditure", "Defence"),
        Some("10.00")
    );
    let warned = capture.count_events(|e| {
        e.level == tracing::Level::WARN
            && e.field("missing").is_some_and(|m| m.contains("GOVT/WELFARE"))
    });
    assert!(warned >= 1);
}

#[test]
fn test_missing_element_reconciles_to_empty_cell() {
    let xml = TESTLANDIA.replace("<WELFARE>15.00</WELFARE>", "");
    let tree = parse_nation(&xml, TIMESTAMP).unwrap();

    let out = reconcile(StoreHandle::New, &tree, &LayoutPolicy::default()).unwrap();

    let spending = out.workbook.sheet("Government expenditure").unwrap();
    let headers = spending.header_row();
    let welfare = headers.iter().position(|h| *h == "Welfare").unwrap();
    assert_eq!(spending.row_values(2)[welfare], "");
    assert_eq!(spending.row_values(2)[0], TIMESTAMP);
}

#[test]
fn test_missing_gdp_blanks_derived_figures() {
    let xml = TESTLANDIA.replace("<GDP>1234567890123</GDP>", "");

    let tree = parse_nation(&xml, TIMESTAMP).unwrap();

    assert_eq!(field(&tree, "Economy", "GDP (billion)"), Some(""));
    assert_eq!(
        field(&tree, "Government expenditure", "Expenditure (billion)"),
        Some("")
    );
    assert_eq!(field(&tree, "Economy", "Ave. wage"), Some("42317"));
}
