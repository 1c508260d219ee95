// Integration tests for opening and saving sheet stores
// Covers the create/append cycle on disk for both formats

use nsxlsx_core::errors::ExErrorKind;
use nsxlsx_core::{reconcile, LayoutPolicy, OutputMode, SnapshotTree, StoreHandle};
use nsxlsx_store::{SheetStore, StoreFormat};
use serde_json::json;
use tempfile::TempDir;

// Helper to create a test store directory
fn setup_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp store directory")
}

fn economy_snapshot(timestamp: &str, gdp: &str) -> SnapshotTree {
    SnapshotTree::from_json(&json!({
        "Economy": { "GDP (billion)": gdp, "Timestamp": timestamp }
    }))
    .expect("valid snapshot")
}

fn run_once(store: &SheetStore, tree: &SnapshotTree) -> OutputMode {
    let handle = store.open().expect("open should succeed");
    let out = reconcile(handle, tree, &LayoutPolicy::default()).expect("reconcile");
    store.save(&out.workbook).expect("save should succeed");
    out.mode
}

#[test]
fn test_absent_store_opens_as_new() {
    // Given: A path with no file
    let dir = setup_test_dir();
    let store = SheetStore::new(dir.path().join("stats.xlsx")).unwrap();

    // When: We open it
    let handle = store.open().unwrap();

    // Then: It is new, and nothing was created on disk
    assert_eq!(handle, StoreHandle::New);
    assert!(!store.path().exists());
}

#[test]
fn test_xlsx_create_then_append_cycle() {
    // Given: An XLSX store path
    let dir = setup_test_dir();
    let store = SheetStore::new(dir.path().join("stats.xlsx")).unwrap();
    assert_eq!(store.format(), StoreFormat::Xlsx);

    // When: Two runs write to it
    let first = run_once(&store, &economy_snapshot("2024-01-01T00:00:00Z", "1.500"));
    let second = run_once(&store, &economy_snapshot("2024-02-01T00:00:00Z", "1.600"));

    // Then: The first created it, the second appended
    assert_eq!(first, OutputMode::Created);
    assert_eq!(second, OutputMode::Appended);

    // And: Reading it back shows both rows under one header
    let StoreHandle::Existing(workbook) = store.open().unwrap() else {
        panic!("store should exist after save");
    };
    let sheet = workbook.sheet("Economy").unwrap();
    assert_eq!(sheet.header_row(), vec!["Timestamp", "GDP (billion)"]);
    assert_eq!(sheet.row_values(2), vec!["2024-01-01T00:00:00Z", "1.500"]);
    assert_eq!(sheet.row_values(3), vec!["2024-02-01T00:00:00Z", "1.600"]);
}

#[test]
fn test_json_store_roundtrip() {
    // Given: A JSON store written once
    let dir = setup_test_dir();
    let store = SheetStore::new(dir.path().join("stats.json")).unwrap();
    run_once(&store, &economy_snapshot("t1", "1.500"));

    // When: We open it
    let handle = store.open().unwrap();

    // Then: The grid is intact
    match handle {
        StoreHandle::Existing(workbook) => {
            let sheet = workbook.sheet("Economy").unwrap();
            assert_eq!(sheet.row_values(2), vec!["t1", "1.500"]);
        }
        StoreHandle::New => panic!("store should exist after save"),
    }
}

#[test]
fn test_unsupported_extension_rejected() {
    let dir = setup_test_dir();

    let err = SheetStore::new(dir.path().join("stats.csv")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Configuration);
}

#[test]
fn test_unreadable_store_is_not_overwritten() {
    // Given: A file at the store path that is not a valid store
    let dir = setup_test_dir();
    let path = dir.path().join("stats.json");
    std::fs::write(&path, b"[1, 2, 3]").unwrap();
    let store = SheetStore::new(&path).unwrap();

    // When: We open it
    let err = store.open().unwrap_err();

    // Then: Opening fails and the file is untouched
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(std::fs::read(&path).unwrap(), b"[1, 2, 3]");
}

#[test]
fn test_failed_save_keeps_io_cause() {
    // Given: A store path whose parent is a regular file
    let dir = setup_test_dir();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"x").unwrap();
    let store = SheetStore::new(blocker.join("stats.json")).unwrap();
    let out = reconcile(
        StoreHandle::New,
        &economy_snapshot("t1", "1.500"),
        &LayoutPolicy::default(),
    )
    .unwrap();

    // When: We save
    let err = store.save(&out.workbook).unwrap_err();

    // Then: The save failure names the store and keeps the IO cause
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(err.op(), Some("save_store"));
    let cause = err.source_error().expect("IO cause attached");
    assert_eq!(cause.kind(), ExErrorKind::Io);
    assert!(err.to_string().contains("<- [ERR_IO]"));
}
