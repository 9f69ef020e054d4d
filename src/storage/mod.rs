pub mod json_backend;
pub mod memory;

use tracing::warn;

use crate::{errors::Result, ledger::Transaction};

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;

/// Slot name the transaction list is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "simple_finance_tx_v1";

/// Where the list returned by [`StorageBackend::load`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing stored under the key yet.
    Empty,
    /// Stored content parsed successfully.
    Stored,
    /// Stored content was unreadable and has been discarded.
    Reset,
}

/// Outcome of reading the stored transaction list.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub transactions: Vec<Transaction>,
    pub source: LoadSource,
    pub warnings: Vec<String>,
}

impl LoadReport {
    fn empty(source: LoadSource, warnings: Vec<String>) -> Self {
        Self {
            transactions: Vec::new(),
            source,
            warnings,
        }
    }
}

/// A single durable key-value slot holding the whole transaction list.
///
/// Backends only move raw text in and out of the slot; encoding and the
/// tolerant load path are shared.
pub trait StorageBackend: Send + Sync {
    fn key(&self) -> &str;

    /// Returns `None` when nothing has been stored under the key.
    fn read_slot(&self) -> Result<Option<String>>;

    /// Replaces the slot contents entirely.
    fn write_slot(&self, data: &str) -> Result<()>;

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string_pretty(transactions)?;
        self.write_slot(&json)
    }

    /// Never fails: unreadable or malformed content yields an empty list.
    fn load(&self) -> LoadReport {
        let raw = match self.read_slot() {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadReport::empty(LoadSource::Empty, Vec::new()),
            Err(err) => {
                warn!(key = self.key(), error = %err, "failed to read stored transactions");
                return LoadReport::empty(
                    LoadSource::Reset,
                    vec![format!("stored data could not be read: {err}")],
                );
            }
        };
        if raw.trim().is_empty() {
            return LoadReport::empty(LoadSource::Empty, Vec::new());
        }
        match serde_json::from_str::<Vec<Transaction>>(&raw) {
            Ok(transactions) => LoadReport {
                transactions,
                source: LoadSource::Stored,
                warnings: Vec::new(),
            },
            Err(err) => {
                warn!(key = self.key(), error = %err, "stored transactions are corrupt; starting empty");
                LoadReport::empty(
                    LoadSource::Reset,
                    vec![format!("stored data was corrupt and has been reset: {err}")],
                )
            }
        }
    }
}
