use std::collections::HashMap;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{LedgerError, Result};
use crate::io::{DATE_FORMAT, MONTH_SHEETS, sanitize_column_name};
use crate::model::{Ledger, RawRecord, Record};
use crate::transform;

/// Reads the twelve monthly sheets into one ledger, preserving each sheet's
/// row order and appending sheets in month order. Every record is normalized
/// and re-derived on the way in, so the derived columns stored in the file
/// are never authoritative.
pub fn read_ledger(path: &Path) -> Result<Ledger> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let mut records = Vec::new();
    for sheet_name in MONTH_SHEETS {
        let range = read_required_sheet(&mut workbook, sheet_name)?;
        ingest_month_sheet(&range, &mut records);
    }

    Ok(Ledger::new(records))
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| LedgerError::InvalidWorkbook(format!("missing month sheet '{name}'")))?;
    let range = range_result.map_err(LedgerError::from)?;
    Ok(range)
}

fn ingest_month_sheet(range: &calamine::Range<DataType>, records: &mut Vec<Record>) {
    let headers: HashMap<String, usize> = match range.rows().next() {
        Some(first_row) => first_row
            .iter()
            .enumerate()
            .map(|(index, cell)| (sanitize_column_name(&cell_to_string(Some(cell))), index))
            .collect(),
        None => return,
    };

    for row in range.rows().skip(1) {
        if row.iter().all(is_blank) {
            continue;
        }

        let raw = RawRecord {
            date: date_field(row, &headers),
            beneficiary: field(row, &headers, "beneficiary"),
            pix_key: field(row, &headers, "pix_key"),
            transacted_amount: field(row, &headers, "transacted_amount"),
            released_amount: field(row, &headers, "released_amount"),
            interest_rate: field(row, &headers, "interest_rate"),
            installment_count: field(row, &headers, "installment_count"),
            commission_percent: field(row, &headers, "commission_percent"),
            extra_fee: field(row, &headers, "extra_fee"),
        };
        records.push(transform::derive(&transform::normalize(&raw)));
    }
}

fn field(row: &[DataType], headers: &HashMap<String, usize>, name: &str) -> Option<String> {
    let index = *headers.get(name)?;
    let value = cell_to_string(row.get(index));
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Date cells may carry a native Excel date or a day-first string; both are
/// surfaced in the day-first text form the normalizer parses.
fn date_field(row: &[DataType], headers: &HashMap<String, usize>) -> Option<String> {
    let index = *headers.get("date")?;
    let cell = row.get(index)?;
    if let Some(date) = cell.as_date() {
        return Some(date.format(DATE_FORMAT).to_string());
    }
    let value = cell_to_string(Some(cell));
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn is_blank(cell: &DataType) -> bool {
    cell_to_string(Some(cell)).trim().is_empty()
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
