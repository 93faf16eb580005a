use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use loanbook::dispatch::{self, Command, DateRange};
use loanbook::io::excel_read;
use loanbook::io::excel_write;
use loanbook::model::{Ledger, RawRecord};
use loanbook::store::LedgerStore;
use loanbook::transform;
use tempfile::tempdir;

fn raw(date: &str, beneficiary: &str) -> RawRecord {
    RawRecord {
        date: Some(date.to_string()),
        beneficiary: Some(beneficiary.to_string()),
        pix_key: Some("111.222.333-44".to_string()),
        transacted_amount: Some("1000".to_string()),
        released_amount: Some("800".to_string()),
        interest_rate: Some("10".to_string()),
        installment_count: Some("3".to_string()),
        commission_percent: Some("5".to_string()),
        extra_fee: Some("0".to_string()),
    }
}

fn seed_store(path: &Path, raws: &[RawRecord]) -> LedgerStore {
    let ledger = raws
        .iter()
        .fold(Ledger::default(), |ledger, raw| transform::append(&ledger, raw));
    excel_write::write_workbook(path, &ledger).expect("seed workbook written");
    LedgerStore::open(path).expect("store opened")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn add_record_persists_to_the_workbook() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("a.xlsx");
    let mut store = seed_store(&path, &[]);

    let outcome = dispatch::dispatch(
        &mut store,
        &DateRange::default(),
        Command::AddRecord(raw("05/02/2025", "Alice")),
    );

    assert_eq!(outcome.message, "record saved");
    assert_eq!(outcome.rows.len(), 1);

    let reopened = LedgerStore::open(&path).expect("store reopened");
    assert_eq!(reopened.ledger().len(), 1);
    assert_eq!(reopened.ledger().records[0].beneficiary, "Alice");
}

#[test]
fn delete_with_empty_selection_warns_and_keeps_the_ledger() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("a.xlsx");
    let mut store = seed_store(&path, &[raw("05/02/2025", "Alice")]);

    let outcome = dispatch::dispatch(
        &mut store,
        &DateRange::default(),
        Command::DeleteSelected { selected: vec![] },
    );

    assert!(outcome.message.starts_with("warning:"), "{}", outcome.message);
    assert_eq!(store.ledger().len(), 1);
}

#[test]
fn delete_maps_selection_through_the_filtered_view() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("a.xlsx");
    let mut store = seed_store(
        &path,
        &[
            raw("10/01/2025", "January"),
            raw("14/02/2025", "February"),
            raw("20/03/2025", "March"),
        ],
    );

    // Row 0 of the February-only view is the ledger's second record.
    let range = DateRange {
        start: Some(date(2025, 2, 1)),
        end: Some(date(2025, 2, 28)),
    };
    let outcome = dispatch::dispatch(
        &mut store,
        &range,
        Command::DeleteSelected { selected: vec![0] },
    );

    assert_eq!(outcome.message, "deleted 1 row(s)");
    assert!(outcome.rows.is_empty());

    let reopened = LedgerStore::open(&path).expect("store reopened");
    assert_eq!(reopened.ledger().len(), 2);
    assert_eq!(reopened.ledger().records[0].beneficiary, "January");
    assert_eq!(reopened.ledger().records[1].beneficiary, "March");
}

#[test]
fn delete_with_stale_selection_warns() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("a.xlsx");
    let mut store = seed_store(&path, &[raw("05/02/2025", "Alice")]);

    let outcome = dispatch::dispatch(
        &mut store,
        &DateRange::default(),
        Command::DeleteSelected { selected: vec![7] },
    );

    assert!(outcome.message.starts_with("warning:"), "{}", outcome.message);
    assert_eq!(store.ledger().len(), 1);
}

#[test]
fn export_produces_a_reimportable_workbook_of_the_filtered_rows() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("a.xlsx");
    let mut store = seed_store(
        &path,
        &[raw("10/01/2025", "January"), raw("14/02/2025", "February")],
    );

    let range = DateRange {
        start: Some(date(2025, 2, 1)),
        end: Some(date(2025, 2, 28)),
    };
    let outcome = dispatch::dispatch(&mut store, &range, Command::ExportRange);

    let payload = outcome.export.expect("export payload");
    assert_eq!(payload.filename, "ledger_export.xlsx");

    let export_path = temp_dir.path().join(payload.filename);
    fs::write(&export_path, payload.bytes).expect("export written");

    let restored = excel_read::read_ledger(&export_path).expect("export read");
    assert_eq!(restored.records, outcome.rows);
    assert_eq!(restored.len(), 1);
    assert_eq!(restored.records[0].beneficiary, "February");
}

#[test]
fn apply_date_filter_reports_consolidated_totals() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("a.xlsx");
    let mut store = seed_store(
        &path,
        &[raw("10/01/2025", "January"), raw("14/02/2025", "February")],
    );

    let outcome = dispatch::dispatch(&mut store, &DateRange::default(), Command::ApplyDateFilter);

    assert_eq!(outcome.rows.len(), 2);
    assert!(outcome.message.contains("CONSOLIDATED REPORT"));
    assert!(outcome.message.contains("Period: 10/01/2025 - 14/02/2025"));
    assert!(outcome.message.contains("Transacted amount: 2000.00"));
    assert!(outcome.message.contains("Commission amount: 80.00"));
}
