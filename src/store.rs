use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::io::excel_read;
use crate::io::excel_write;
use crate::model::Ledger;

/// Owned session state: the workbook path plus the current ledger snapshot.
///
/// The store has a single mutation entry point, [`LedgerStore::commit`],
/// which replaces the whole collection and rewrites the whole workbook.
/// Records are never edited in place, so a caller can hold the previous
/// snapshot until its replacement is committed.
#[derive(Debug)]
pub struct LedgerStore {
    path: PathBuf,
    ledger: Ledger,
}

impl LedgerStore {
    /// Loads the workbook at `path`, re-deriving every record.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let ledger = excel_read::read_ledger(path)?;
        info!(record_count = ledger.len(), "loaded ledger from workbook");
        Ok(Self {
            path: path.to_path_buf(),
            ledger,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current ledger snapshot.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Replaces the whole collection and rewrites the whole workbook.
    ///
    /// The in-memory replacement happens first: when persistence fails the
    /// new state is retained so nothing already held is lost, and the error
    /// is surfaced to the caller.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub fn commit(&mut self, ledger: Ledger) -> Result<()> {
        self.ledger = ledger;
        debug!(record_count = self.ledger.len(), "replacing ledger snapshot");
        excel_write::write_workbook(&self.path, &self.ledger)?;
        info!(record_count = self.ledger.len(), "workbook rewritten");
        Ok(())
    }

    /// Discards the in-memory snapshot and reloads from storage.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub fn reload(&mut self) -> Result<()> {
        self.ledger = excel_read::read_ledger(&self.path)?;
        info!(record_count = self.ledger.len(), "reloaded ledger from workbook");
        Ok(())
    }
}
