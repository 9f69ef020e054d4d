#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use daily_ledger::{
    ledger::{LedgerBook, ManualClock, TransactionDraft, TransactionKind},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn fixed_instant() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_704_067_200_000).expect("valid instant")
}

/// Opens a book over a JSON slot in `base`, with a clock frozen at
/// [`fixed_instant`].
pub fn open_book(base: &Path) -> LedgerBook {
    let storage = JsonStorage::new(Some(base.to_path_buf()), None).expect("create json storage backend");
    LedgerBook::open_with_clock(Box::new(storage), Box::new(ManualClock::new(fixed_instant())))
}

/// Creates an isolated book backed by a unique directory.
pub fn setup_test_env() -> (LedgerBook, PathBuf) {
    let base = test_dir();
    (open_book(&base), base)
}

pub fn income(amount: &str, date: &str) -> TransactionDraft {
    TransactionDraft::new(TransactionKind::Income, amount, date)
}

pub fn expense(amount: &str, date: &str) -> TransactionDraft {
    TransactionDraft::new(TransactionKind::Expense, amount, date)
}
