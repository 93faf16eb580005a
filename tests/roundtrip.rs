use std::fs;

use chrono::NaiveDate;
use loanbook::LedgerError;
use loanbook::io::excel_read;
use loanbook::io::excel_write;
use loanbook::model::{Ledger, RawRecord};
use loanbook::transform;
use tempfile::tempdir;

fn raw(date: &str, beneficiary: &str, transacted: &str, released: &str) -> RawRecord {
    RawRecord {
        date: Some(date.to_string()),
        beneficiary: Some(beneficiary.to_string()),
        pix_key: Some("111.222.333-44".to_string()),
        transacted_amount: Some(transacted.to_string()),
        released_amount: Some(released.to_string()),
        interest_rate: Some("10".to_string()),
        installment_count: Some("3".to_string()),
        commission_percent: Some("5".to_string()),
        extra_fee: Some("1.25".to_string()),
    }
}

fn ledger_of(raws: &[RawRecord]) -> Ledger {
    raws.iter()
        .fold(Ledger::default(), |ledger, raw| transform::append(&ledger, raw))
}

#[test]
fn workbook_roundtrip_preserves_records() {
    let ledger = ledger_of(&[
        raw("05/01/2025", "Alice", "1000", "800"),
        raw("14/02/2025", "Bob", "2500.50", "2000.25"),
        raw("28/02/2025", "Carol", "750", "600"),
        raw("31/12/2025", "Dave", "100", "0"),
    ]);

    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("a.xlsx");
    excel_write::write_workbook(&path, &ledger).expect("workbook written");

    let restored = excel_read::read_ledger(&path).expect("workbook read");

    assert_eq!(restored, ledger);
}

#[test]
fn reload_concatenates_sheets_in_month_order() {
    // Appended out of calendar order; the reload is grouped by month sheet.
    let ledger = ledger_of(&[
        raw("20/03/2025", "March", "300", "200"),
        raw("10/01/2025", "January", "100", "50"),
    ]);

    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("a.xlsx");
    excel_write::write_workbook(&path, &ledger).expect("workbook written");

    let restored = excel_read::read_ledger(&path).expect("workbook read");

    assert_eq!(restored.records[0].beneficiary, "January");
    assert_eq!(restored.records[1].beneficiary, "March");
}

#[test]
fn export_reimport_matches_filtered_rows() {
    let ledger = ledger_of(&[
        raw("05/01/2025", "Alice", "1000", "800"),
        raw("14/02/2025", "Bob", "2500.50", "2000.25"),
        raw("20/03/2025", "Carol", "750", "600"),
    ]);

    let start = NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2025, 2, 28).expect("valid date");
    let filtered = transform::filter_by_date(&ledger, Some(start), Some(end));
    assert_eq!(filtered.len(), 1);

    let bytes = excel_write::export_bytes(&Ledger::new(filtered.clone())).expect("export bytes");

    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("export.xlsx");
    fs::write(&path, bytes).expect("export written");

    let restored = excel_read::read_ledger(&path).expect("export read");
    assert_eq!(restored.records, filtered);
}

#[test]
fn empty_ledger_still_writes_all_twelve_sheets() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("empty.xlsx");
    excel_write::write_workbook(&path, &Ledger::default()).expect("workbook written");

    let restored = excel_read::read_ledger(&path).expect("workbook read");
    assert!(restored.is_empty());
}

#[test]
fn workbook_missing_a_month_sheet_is_rejected() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("partial.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("JAN").expect("sheet named");
    worksheet.write_string(0, 0, "date").expect("header written");
    workbook.save(&path).expect("workbook saved");

    let result = excel_read::read_ledger(&path);
    assert!(matches!(result, Err(LedgerError::InvalidWorkbook(_))));
}
