//! Storage conventions for the monthly workbook, shared by the reader and
//! the writer.

pub mod excel_read;
pub mod excel_write;

/// Sheet names of the twelve monthly tables, in calendar order. These are
/// the on-disk contract of the workbook format; existing files rely on
/// them verbatim.
pub const MONTH_SHEETS: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

/// Canonical column order written to every month sheet.
pub const COLUMNS: [&str; 14] = [
    "date",
    "beneficiary",
    "pix_key",
    "transacted_amount",
    "released_amount",
    "interest_rate",
    "installment_count",
    "commission_percent",
    "extra_fee",
    "commission_amount",
    "net_amount",
    "percent_of_transacted",
    "percent_of_released",
    "invoice_amount",
];

/// Day-first date format used for date cells.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Canonicalizes a header cell so hand-edited workbooks still map onto the
/// record fields: trim, lower-case, spaces to underscores, parentheses and
/// question marks stripped.
pub fn sanitize_column_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter_map(|ch| match ch {
            ' ' => Some('_'),
            '(' | ')' | '?' => None,
            other => Some(other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::sanitize_column_name;

    #[test]
    fn sanitizes_decorated_headers() {
        assert_eq!(sanitize_column_name(" Transacted Amount "), "transacted_amount");
        assert_eq!(sanitize_column_name("Pix Key (CPF?)"), "pix_key_cpf");
        assert_eq!(sanitize_column_name("date"), "date");
    }
}
