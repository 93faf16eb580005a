use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One loan disbursement entry with its base and derived fields.
///
/// The derived fields (`commission_amount` through `invoice_amount`) are a
/// pure function of the base fields and are recomputed on every write path;
/// they are carried on the record only so the grid and the workbook show
/// them without recomputation on display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub beneficiary: String,
    pub pix_key: String,
    pub transacted_amount: Decimal,
    pub released_amount: Decimal,
    pub interest_rate: Decimal,
    pub installment_count: Decimal,
    pub commission_percent: Decimal,
    pub extra_fee: Decimal,
    pub commission_amount: Decimal,
    pub net_amount: Decimal,
    pub percent_of_transacted: Decimal,
    pub percent_of_released: Decimal,
    pub invoice_amount: Decimal,
}

/// Raw form or spreadsheet input for a single record, before normalization.
///
/// Every field is optional text; malformed or absent values are replaced
/// with defaults rather than rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub date: Option<String>,
    pub beneficiary: Option<String>,
    pub pix_key: Option<String>,
    pub transacted_amount: Option<String>,
    pub released_amount: Option<String>,
    pub interest_rate: Option<String>,
    pub installment_count: Option<String>,
    pub commission_percent: Option<String>,
    pub extra_fee: Option<String>,
}

/// The full ordered collection of records for the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub records: Vec<Record>,
}

impl Ledger {
    /// Creates a ledger from an already-derived record collection.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest date present in the ledger.
    pub fn min_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|record| record.date).min()
    }

    /// Latest date present in the ledger.
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|record| record.date).max()
    }
}

/// Sums over a record sequence, as shown in the consolidated report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub transacted_amount: Decimal,
    pub released_amount: Decimal,
    pub commission_amount: Decimal,
    pub net_amount: Decimal,
    pub extra_fee: Decimal,
}
