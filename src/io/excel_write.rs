use std::path::Path;

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::io::{COLUMNS, DATE_FORMAT, MONTH_SHEETS};
use crate::model::{Ledger, Record};

/// Writes the ledger to the given path, split across the twelve monthly
/// sheets. Empty months still get their sheet so the workbook shape stays
/// constant.
pub fn write_workbook(path: &Path, ledger: &Ledger) -> Result<()> {
    let mut workbook = build_workbook(ledger)?;
    workbook.save(path)?;
    Ok(())
}

/// Renders the ledger into workbook bytes for the export download. No file
/// is produced on failure.
pub fn export_bytes(ledger: &Ledger) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(ledger)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(ledger: &Ledger) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    for (month_index, sheet_name) in MONTH_SHEETS.iter().enumerate() {
        let month = month_index as u32 + 1;
        let rows: Vec<&Record> = ledger
            .records
            .iter()
            .filter(|record| record.date.month() == month)
            .collect();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*sheet_name)?;

        for (col_idx, header) in COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, *header)?;
        }

        for (row_idx, record) in rows.iter().enumerate() {
            let row = (row_idx + 1) as u32;
            let date_cell = record.date.format(DATE_FORMAT).to_string();
            worksheet.write_string(row, 0, &date_cell)?;
            worksheet.write_string(row, 1, &record.beneficiary)?;
            worksheet.write_string(row, 2, &record.pix_key)?;
            worksheet.write_number(row, 3, cell_number(record.transacted_amount))?;
            worksheet.write_number(row, 4, cell_number(record.released_amount))?;
            worksheet.write_number(row, 5, cell_number(record.interest_rate))?;
            worksheet.write_number(row, 6, cell_number(record.installment_count))?;
            worksheet.write_number(row, 7, cell_number(record.commission_percent))?;
            worksheet.write_number(row, 8, cell_number(record.extra_fee))?;
            worksheet.write_number(row, 9, cell_number(record.commission_amount))?;
            worksheet.write_number(row, 10, cell_number(record.net_amount))?;
            worksheet.write_number(row, 11, cell_number(record.percent_of_transacted))?;
            worksheet.write_number(row, 12, cell_number(record.percent_of_released))?;
            worksheet.write_number(row, 13, cell_number(record.invoice_amount))?;
        }

        let mut excel_table = rust_xlsxwriter::Table::new();
        excel_table.set_autofilter(true);

        let col_end = (COLUMNS.len() as u16).saturating_sub(1);
        // An Excel table needs a data row; empty months get one blank row,
        // which the reader skips.
        let row_end = rows.len().max(1) as u32;
        worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
    }

    Ok(workbook)
}

fn cell_number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
