use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use loanbook::dispatch::{self, Command, DateRange};
use loanbook::io::{COLUMNS, DATE_FORMAT};
use loanbook::model::{RawRecord, Record};
use loanbook::store::LedgerStore;
use loanbook::transform;
use loanbook::{LedgerError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;

    if !cli.file.exists() {
        return Err(LedgerError::MissingInput(cli.file));
    }
    let mut store = LedgerStore::open(&cli.file)?;

    match cli.command {
        Action::Show { start, end, json } => {
            let range = parse_range(start.as_deref(), end.as_deref());
            let outcome = dispatch::dispatch(&mut store, &range, Command::ApplyDateFilter);
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.rows)?);
            } else {
                println!("{}", render_grid(&outcome.rows));
                println!();
                println!("{}", outcome.message);
            }
        }
        Action::Add {
            date,
            beneficiary,
            pix_key,
            transacted,
            released,
            interest,
            installments,
            commission_percent,
            extra,
        } => {
            let raw = RawRecord {
                date,
                beneficiary,
                pix_key,
                transacted_amount: transacted,
                released_amount: released,
                interest_rate: interest,
                installment_count: installments,
                commission_percent,
                extra_fee: extra,
            };
            let outcome =
                dispatch::dispatch(&mut store, &DateRange::default(), Command::AddRecord(raw));
            println!("{}", outcome.message);
        }
        Action::Delete { rows, start, end } => {
            let range = parse_range(start.as_deref(), end.as_deref());
            // Grid rows are shown 1-based; a stray 0 simply drops out and
            // the empty-selection warning covers it.
            let selected: Vec<usize> = rows
                .iter()
                .filter_map(|&row| row.checked_sub(1))
                .collect();
            let outcome =
                dispatch::dispatch(&mut store, &range, Command::DeleteSelected { selected });
            println!("{}", outcome.message);
        }
        Action::Export { output, start, end } => {
            let range = parse_range(start.as_deref(), end.as_deref());
            let outcome = dispatch::dispatch(&mut store, &range, Command::ExportRange);
            match outcome.export {
                Some(payload) => {
                    fs::write(&output, payload.bytes)?;
                    println!("{}: {}", outcome.message, output.display());
                }
                None => println!("{}", outcome.message),
            }
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| LedgerError::Logging(error.to_string()))
}

fn parse_range(start: Option<&str>, end: Option<&str>) -> DateRange {
    // Unparseable bounds open the range, mirroring the date picker's
    // silent fallback to the ledger's own extent.
    DateRange {
        start: start.and_then(transform::parse_user_date),
        end: end.and_then(transform::parse_user_date),
    }
}

fn render_grid(rows: &[Record]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header: Vec<Cell> = vec![Cell::new("#")];
    header.extend(COLUMNS.iter().map(|column| Cell::new(column.to_uppercase())));
    table.set_header(header);

    for (index, record) in rows.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            record.date.format(DATE_FORMAT).to_string(),
            record.beneficiary.clone(),
            record.pix_key.clone(),
            format!("{:.2}", record.transacted_amount),
            format!("{:.2}", record.released_amount),
            format!("{:.2}", record.interest_rate),
            format!("{:.2}", record.installment_count),
            format!("{:.2}", record.commission_percent),
            format!("{:.2}", record.extra_fee),
            format!("{:.2}", record.commission_amount),
            format!("{:.2}", record.net_amount),
            format!("{:.2}", record.percent_of_transacted),
            format!("{:.2}", record.percent_of_released),
            format!("{:.2}", record.invoice_amount),
        ]);
    }

    table
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Track loan disbursements stored in a monthly spreadsheet workbook."
)]
struct Cli {
    /// Workbook path.
    #[arg(long, default_value = "a.xlsx")]
    file: PathBuf,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the filtered grid and the consolidated totals report.
    Show {
        /// Start of the date filter (DD/MM/YYYY).
        #[arg(long)]
        start: Option<String>,

        /// End of the date filter (DD/MM/YYYY).
        #[arg(long)]
        end: Option<String>,

        /// Emit the filtered rows as JSON instead of a grid.
        #[arg(long)]
        json: bool,
    },
    /// Append one record; omitted or malformed values take their defaults.
    Add {
        /// Disbursement date (DD/MM/YYYY).
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        beneficiary: Option<String>,

        #[arg(long)]
        pix_key: Option<String>,

        /// Transacted amount.
        #[arg(long)]
        transacted: Option<String>,

        /// Released amount.
        #[arg(long)]
        released: Option<String>,

        /// Interest rate amount.
        #[arg(long)]
        interest: Option<String>,

        /// Installment count.
        #[arg(long)]
        installments: Option<String>,

        /// Commission percentage.
        #[arg(long)]
        commission_percent: Option<String>,

        /// Extra fee amount.
        #[arg(long)]
        extra: Option<String>,
    },
    /// Delete rows by their grid number within the filtered view.
    Delete {
        /// Row numbers as shown in the grid (1-based).
        #[arg(long, value_delimiter = ',', required = true)]
        rows: Vec<usize>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,
    },
    /// Write the filtered rows to a new workbook.
    Export {
        /// Destination path for the exported workbook.
        #[arg(long)]
        output: PathBuf,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,
    },
}
