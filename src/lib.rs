//! Core library for the loanbook command line application.
//!
//! The library exposes the ledger logic that powers the command-line
//! interface as well as the integration tests. The modules are structured to
//! keep responsibilities narrow and composable: the pure record transforms
//! live in [`transform`], data representations inside [`model`], workbook IO
//! adapters under [`io`], session state in [`store`], and the user-action
//! boundary in [`dispatch`].

pub mod dispatch;
pub mod error;
pub mod io;
pub mod model;
pub mod store;
pub mod transform;

pub use error::{LedgerError, Result};
