//! Explicit command dispatch for the four dashboard actions.
//!
//! Each action is a pure transform over the current ledger snapshot followed
//! by at most one store commit. `dispatch` is the recovery boundary of the
//! crate: every failure comes back as a formatted status message, never as a
//! panic or an `Err`, matching the "status text, not a crash" contract of
//! the form-driven UI.

use chrono::NaiveDate;
use tracing::{instrument, warn};

use crate::error::LedgerError;
use crate::io::DATE_FORMAT;
use crate::io::excel_write;
use crate::model::{Ledger, RawRecord, Record, Totals};
use crate::store::LedgerStore;
use crate::transform;

/// Inclusive date filter; an open bound falls back to the ledger's own
/// minimum or maximum date.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// One user action against the ledger.
#[derive(Debug, Clone)]
pub enum Command {
    /// Persist a new row built from form input.
    AddRecord(RawRecord),
    /// Delete the selected rows; positions index the filtered view.
    DeleteSelected { selected: Vec<usize> },
    /// Produce a downloadable workbook holding only the filtered rows.
    ExportRange,
    /// Refresh the filtered view and the consolidated totals report.
    ApplyDateFilter,
}

/// Downloadable artifact produced by [`Command::ExportRange`].
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What an action hands back to the UI layer: a status message, the
/// refreshed filtered row set, and an optional download.
#[derive(Debug)]
pub struct Outcome {
    pub message: String,
    pub rows: Vec<Record>,
    pub export: Option<ExportPayload>,
}

/// Runs one command against the store under the given date range.
#[instrument(level = "info", skip_all, fields(range = ?range))]
pub fn dispatch(store: &mut LedgerStore, range: &DateRange, command: Command) -> Outcome {
    match command {
        Command::AddRecord(raw) => add_record(store, range, raw),
        Command::DeleteSelected { selected } => delete_selected(store, range, &selected),
        Command::ExportRange => export_range(store, range),
        Command::ApplyDateFilter => apply_date_filter(store, range),
    }
}

fn filtered_rows(store: &LedgerStore, range: &DateRange) -> Vec<Record> {
    transform::filter_by_date(store.ledger(), range.start, range.end)
}

fn add_record(store: &mut LedgerStore, range: &DateRange, raw: RawRecord) -> Outcome {
    let next = transform::append(store.ledger(), &raw);
    let message = match store.commit(next) {
        Ok(()) => "record saved".to_string(),
        // The new record stays in memory; only the rewrite failed.
        Err(error) => {
            warn!(%error, "workbook rewrite failed after add");
            format!("error: could not persist the workbook: {error}")
        }
    };
    Outcome {
        message,
        rows: filtered_rows(store, range),
        export: None,
    }
}

fn delete_selected(store: &mut LedgerStore, range: &DateRange, selected: &[usize]) -> Outcome {
    // Selections come from the filtered grid; map them back onto ledger
    // positions through the active range before removing.
    let visible_positions: Vec<usize> = {
        let Some((start, end)) =
            transform::resolve_range(store.ledger(), range.start, range.end)
        else {
            return warning_outcome(store, range);
        };
        store
            .ledger()
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| start <= record.date && record.date <= end)
            .map(|(position, _)| position)
            .collect()
    };

    let positions: Vec<usize> = selected
        .iter()
        .filter_map(|&index| visible_positions.get(index).copied())
        .collect();
    if positions.len() != selected.len() {
        return warning_outcome(store, range);
    }

    let next = match transform::remove(store.ledger(), &positions) {
        Ok(next) => next,
        Err(LedgerError::InvalidSelection) => return warning_outcome(store, range),
        Err(error) => {
            return Outcome {
                message: format!("error: could not delete: {error}"),
                rows: filtered_rows(store, range),
                export: None,
            };
        }
    };

    let removed = store.ledger().len() - next.len();
    let message = match store.commit(next) {
        Ok(()) => format!("deleted {removed} row(s)"),
        Err(error) => {
            warn!(%error, "workbook rewrite failed after delete");
            format!("error: could not persist the workbook: {error}")
        }
    };
    Outcome {
        message,
        rows: filtered_rows(store, range),
        export: None,
    }
}

fn warning_outcome(store: &LedgerStore, range: &DateRange) -> Outcome {
    Outcome {
        message: "warning: select at least one row before deleting".to_string(),
        rows: filtered_rows(store, range),
        export: None,
    }
}

fn export_range(store: &LedgerStore, range: &DateRange) -> Outcome {
    let rows = filtered_rows(store, range);
    match excel_write::export_bytes(&Ledger::new(rows.clone())) {
        Ok(bytes) => Outcome {
            message: "export ready".to_string(),
            rows,
            export: Some(ExportPayload {
                filename: "ledger_export.xlsx".to_string(),
                bytes,
            }),
        },
        Err(error) => {
            warn!(%error, "export failed");
            Outcome {
                message: format!("error: export failed: {error}"),
                rows,
                export: None,
            }
        }
    }
}

fn apply_date_filter(store: &LedgerStore, range: &DateRange) -> Outcome {
    let rows = filtered_rows(store, range);
    let totals = transform::summarize(&rows);
    Outcome {
        message: consolidated_report(store.ledger(), range, &totals),
        rows,
        export: None,
    }
}

/// The totals panel shown under the grid: the filtered period plus the five
/// monetary sums.
pub fn consolidated_report(ledger: &Ledger, range: &DateRange, totals: &Totals) -> String {
    let (start, end) = match transform::resolve_range(ledger, range.start, range.end) {
        Some((start, end)) => (
            start.format(DATE_FORMAT).to_string(),
            end.format(DATE_FORMAT).to_string(),
        ),
        None => ("N/A".to_string(), "N/A".to_string()),
    };

    format!(
        "CONSOLIDATED REPORT\n\
         Period: {start} - {end}\n\
         \n\
         Transacted amount: {:.2}\n\
         Released amount:   {:.2}\n\
         Commission amount: {:.2}\n\
         Net amount:        {:.2}\n\
         Extra fee:         {:.2}",
        totals.transacted_amount,
        totals.released_amount,
        totals.commission_amount,
        totals.net_amount,
        totals.extra_fee,
    )
}
