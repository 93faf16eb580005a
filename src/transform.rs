//! Pure functions over the ledger: normalizing raw rows, recomputing the
//! derived financial fields, filtering by date range, and building new
//! ledger snapshots for the add and delete flows.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::model::{Ledger, RawRecord, Record, Totals};

/// Rate applied to the transacted amount for the invoice column.
const INVOICE_RATE_MILLIS: i64 = 32;

/// Substituted for absent or unparseable dates.
pub fn default_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("2025-01-01 is a valid date")
}

/// Parses a user-entered or spreadsheet date value.
///
/// Accepts day-first (`DD/MM/YYYY`) and ISO (`YYYY-MM-DD`) forms; a trailing
/// time component is ignored. Returns `None` on failure so callers can pick
/// their own substitute.
pub fn parse_user_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let value = value.split('T').next().unwrap_or(value).trim();
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

fn parse_date_field(value: Option<&str>) -> NaiveDate {
    value.and_then(parse_user_date).unwrap_or_else(default_date)
}

fn parse_amount_field(value: Option<&str>) -> Decimal {
    value
        .and_then(|raw| raw.trim().parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}

fn text_field(value: Option<&str>) -> String {
    value.map(|raw| raw.trim().to_string()).unwrap_or_default()
}

/// Coerces a raw row into the canonical record shape.
///
/// Malformed values never raise: dates fall back to [`default_date`] and
/// numerics to zero, with every numeric rounded to two decimals. The derived
/// fields are left at zero; callers compose with [`derive`].
pub fn normalize(raw: &RawRecord) -> Record {
    Record {
        date: parse_date_field(raw.date.as_deref()),
        beneficiary: text_field(raw.beneficiary.as_deref()),
        pix_key: text_field(raw.pix_key.as_deref()),
        transacted_amount: parse_amount_field(raw.transacted_amount.as_deref()),
        released_amount: parse_amount_field(raw.released_amount.as_deref()),
        interest_rate: parse_amount_field(raw.interest_rate.as_deref()),
        installment_count: parse_amount_field(raw.installment_count.as_deref()),
        commission_percent: parse_amount_field(raw.commission_percent.as_deref()),
        extra_fee: parse_amount_field(raw.extra_fee.as_deref()),
        commission_amount: Decimal::ZERO,
        net_amount: Decimal::ZERO,
        percent_of_transacted: Decimal::ZERO,
        percent_of_released: Decimal::ZERO,
        invoice_amount: Decimal::ZERO,
    }
}

/// Recomputes the five derived fields from the record's base fields.
///
/// Commission is computed before the net amount, which depends on it.
/// Division by zero substitutes zero by business policy rather than
/// signalling an error. Idempotent: the derived fields are ignored as
/// inputs.
pub fn derive(record: &Record) -> Record {
    let mut derived = record.clone();

    derived.commission_amount =
        (record.released_amount * record.commission_percent / Decimal::ONE_HUNDRED).round_dp(2);
    derived.net_amount = (record.transacted_amount
        - record.released_amount
        - record.interest_rate
        - derived.commission_amount
        - record.extra_fee)
        .round_dp(2);
    derived.percent_of_transacted = if record.transacted_amount.is_zero() {
        Decimal::ZERO
    } else {
        (derived.net_amount / record.transacted_amount * Decimal::ONE_HUNDRED).round_dp(2)
    };
    derived.percent_of_released = if record.released_amount.is_zero() {
        Decimal::ZERO
    } else {
        (derived.net_amount / record.released_amount * Decimal::ONE_HUNDRED).round_dp(2)
    };
    derived.invoice_amount =
        (record.transacted_amount * Decimal::new(INVOICE_RATE_MILLIS, 3)).round_dp(2);

    derived
}

/// Returns the records whose date lies in the inclusive `[start, end]`
/// interval, preserving insertion order.
///
/// An absent bound substitutes the minimum or maximum date present in the
/// ledger, so omitting both bounds returns the full ledger.
pub fn filter_by_date(
    ledger: &Ledger,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Record> {
    let Some((start, end)) = resolve_range(ledger, start, end) else {
        return Vec::new();
    };

    ledger
        .records
        .iter()
        .filter(|record| start <= record.date && record.date <= end)
        .cloned()
        .collect()
}

/// Resolves the effective bounds of a possibly-open date range against the
/// ledger contents. `None` only for an empty ledger with an open bound.
pub fn resolve_range(
    ledger: &Ledger,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = start.or_else(|| ledger.min_date())?;
    let end = end.or_else(|| ledger.max_date())?;
    Some((start, end))
}

/// Sums the reported monetary columns over the given records.
pub fn summarize(records: &[Record]) -> Totals {
    let mut totals = Totals::default();
    for record in records {
        totals.transacted_amount += record.transacted_amount;
        totals.released_amount += record.released_amount;
        totals.commission_amount += record.commission_amount;
        totals.net_amount += record.net_amount;
        totals.extra_fee += record.extra_fee;
    }
    totals
}

/// Returns a new ledger with `derive(normalize(raw))` appended. The input
/// ledger is untouched.
pub fn append(ledger: &Ledger, raw: &RawRecord) -> Ledger {
    let mut records = ledger.records.clone();
    records.push(derive(&normalize(raw)));
    Ledger::new(records)
}

/// Returns a new ledger without the records at the given positions.
///
/// Fails with [`LedgerError::InvalidSelection`] when the selection is empty
/// or names a position past the end of the ledger (a stale selection); the
/// input ledger is unchanged either way.
pub fn remove(ledger: &Ledger, positions: &[usize]) -> Result<Ledger> {
    if positions.is_empty() {
        return Err(LedgerError::InvalidSelection);
    }

    let positions: BTreeSet<usize> = positions.iter().copied().collect();
    if positions.iter().any(|&position| position >= ledger.len()) {
        return Err(LedgerError::InvalidSelection);
    }

    let records = ledger
        .records
        .iter()
        .enumerate()
        .filter(|(index, _)| !positions.contains(index))
        .map(|(_, record)| record.clone())
        .collect();
    Ok(Ledger::new(records))
}
