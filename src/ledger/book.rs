use tracing::{debug, info, warn};

use super::{
    clock::{Clock, SystemClock},
    ledger::Ledger,
    summary::{DateRange, Totals},
    transaction::{Transaction, TransactionDraft},
};
use crate::{
    errors::{LedgerError, Result},
    storage::{LoadSource, StorageBackend},
};

/// Whether a mutation should be written to storage right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persist {
    #[default]
    Now,
    /// Skip the save; the caller batches it with a follow-up mutation.
    Defer,
}

/// A ledger bound to its storage slot. Every mutation is persisted unless
/// explicitly deferred.
pub struct LedgerBook {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    load_warnings: Vec<String>,
    load_source: LoadSource,
}

impl LedgerBook {
    /// Opens the book and reads whatever the slot currently holds.
    pub fn open(storage: Box<dyn StorageBackend>) -> Self {
        Self::open_with_clock(storage, Box::new(SystemClock))
    }

    pub fn open_with_clock(storage: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Self {
        let mut book = Self {
            ledger: Ledger::new(),
            storage,
            clock,
            load_warnings: Vec::new(),
            load_source: LoadSource::Empty,
        };
        book.load();
        book
    }

    /// Replaces the in-memory list with the stored one. Unreadable data
    /// resets the ledger to empty; the reasons are kept as warnings.
    pub fn load(&mut self) -> &[String] {
        let report = self.storage.load();
        let (ledger, dropped) = Ledger::from_transactions(report.transactions);
        for warning in &dropped {
            warn!(key = self.storage.key(), "{warning}");
        }
        self.ledger = ledger;
        self.load_source = report.source;
        self.load_warnings = report.warnings;
        self.load_warnings.extend(dropped);
        debug!(
            key = self.storage.key(),
            count = self.ledger.len(),
            source = ?self.load_source,
            "ledger loaded"
        );
        &self.load_warnings
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    pub fn save(&self) -> Result<()> {
        self.storage.save(self.ledger.transactions())?;
        debug!(key = self.storage.key(), count = self.ledger.len(), "ledger saved");
        Ok(())
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Transaction> {
        self.ledger.get(id)
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Validates and records a new entry. Invalid input, or a failed save,
    /// leaves the ledger untouched.
    pub fn add(&mut self, draft: &TransactionDraft) -> Result<Transaction> {
        let entry = draft.validate()?;
        let snapshot = self.ledger.clone();
        let created = self.ledger.add(entry, self.clock.now()).clone();
        self.commit(snapshot)?;
        info!(
            id = created.id,
            kind = %created.kind,
            amount = created.amount,
            "transaction added"
        );
        Ok(created)
    }

    /// Removes the entry with `id`. Returns `None` when it did not exist, which
    /// is not an error.
    pub fn remove(&mut self, id: u64, persist: Persist) -> Result<Option<Transaction>> {
        let snapshot = self.ledger.clone();
        let removed = self.ledger.remove(id);
        match &removed {
            Some(_) if persist == Persist::Now => self.commit(snapshot)?,
            Some(_) => {}
            None => {
                debug!(id, "remove ignored; no such transaction");
                return Ok(None);
            }
        }
        info!(id, "transaction removed");
        Ok(removed)
    }

    /// Edits an entry in place; the id is preserved.
    pub fn update(&mut self, id: u64, draft: &TransactionDraft) -> Result<Transaction> {
        let entry = draft.validate()?;
        let snapshot = self.ledger.clone();
        let updated = self.ledger.update(id, entry)?.clone();
        self.commit(snapshot)?;
        info!(id, "transaction updated");
        Ok(updated)
    }

    /// Edits by deleting the old entry and recording the draft as a new one,
    /// saving once. The replacement gets a fresh id.
    pub fn replace(&mut self, id: u64, draft: &TransactionDraft) -> Result<Transaction> {
        let entry = draft.validate()?;
        if self.ledger.get(id).is_none() {
            return Err(LedgerError::TransactionNotFound(id));
        }
        let snapshot = self.ledger.clone();
        self.ledger.remove(id);
        let created = self.ledger.add(entry, self.clock.now()).clone();
        self.commit(snapshot)?;
        info!(old_id = id, new_id = created.id, "transaction replaced");
        Ok(created)
    }

    /// Drops every entry. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let snapshot = self.ledger.clone();
        let removed = self.ledger.clear();
        self.commit(snapshot)?;
        info!(removed, "ledger cleared");
        Ok(removed)
    }

    /// Saves the current state, restoring `snapshot` when the save fails so
    /// memory never holds changes storage does not.
    fn commit(&mut self, snapshot: Ledger) -> Result<()> {
        if let Err(err) = self.save() {
            warn!(key = self.storage.key(), error = %err, "save failed; change rolled back");
            self.ledger = snapshot;
            return Err(err);
        }
        Ok(())
    }

    pub fn filter_by_date_range(&self, range: &DateRange) -> Vec<Transaction> {
        self.ledger.filter_by_date_range(range)
    }

    /// The list a view should show: filtered when a range is active.
    pub fn visible(&self, range: Option<&DateRange>) -> Vec<Transaction> {
        match range {
            Some(range) if !range.is_unbounded() => self.filter_by_date_range(range),
            _ => self.ledger.transactions().to_vec(),
        }
    }

    pub fn totals(&self) -> Totals {
        self.ledger.totals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ManualClock, TransactionKind};
    use crate::storage::MemoryStorage;
    use chrono::DateTime;
    use std::io;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    struct SharedSlot(Arc<MemoryStorage>);

    impl StorageBackend for SharedSlot {
        fn key(&self) -> &str {
            self.0.key()
        }

        fn read_slot(&self) -> Result<Option<String>> {
            self.0.read_slot()
        }

        fn write_slot(&self, data: &str) -> Result<()> {
            self.0.write_slot(data)
        }
    }

    /// Accepts reads, but every write fails once `broken` is set.
    struct FlakySlot {
        inner: MemoryStorage,
        broken: Arc<AtomicBool>,
    }

    impl StorageBackend for FlakySlot {
        fn key(&self) -> &str {
            self.inner.key()
        }

        fn read_slot(&self) -> Result<Option<String>> {
            self.inner.read_slot()
        }

        fn write_slot(&self, data: &str) -> Result<()> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into());
            }
            self.inner.write_slot(data)
        }
    }

    fn flaky_book() -> (LedgerBook, Arc<AtomicBool>) {
        let broken = Arc::new(AtomicBool::new(false));
        let slot = FlakySlot {
            inner: MemoryStorage::new(),
            broken: broken.clone(),
        };
        (LedgerBook::open(Box::new(slot)), broken)
    }

    fn book() -> (LedgerBook, Arc<MemoryStorage>) {
        let slot = Arc::new(MemoryStorage::new());
        let clock = ManualClock::new(DateTime::from_timestamp_millis(1_704_067_200_000).unwrap());
        let book =
            LedgerBook::open_with_clock(Box::new(SharedSlot(slot.clone())), Box::new(clock));
        (book, slot)
    }

    #[test]
    fn add_persists_immediately() {
        let (mut book, slot) = book();
        book.add(&TransactionDraft::new(
            TransactionKind::Income,
            "100",
            "2024-01-01",
        ))
        .unwrap();
        assert!(slot.contents().unwrap().contains("\"amount\": 100"));
    }

    #[test]
    fn invalid_add_does_not_touch_storage() {
        let (mut book, slot) = book();
        let err = book
            .add(&TransactionDraft::new(TransactionKind::Income, "-1", "2024-01-01"))
            .expect_err("negative amount");
        assert!(err.is_validation());
        assert!(book.is_empty());
        assert!(slot.contents().is_none());
    }

    #[test]
    fn deferred_remove_skips_the_save() {
        let (mut book, slot) = book();
        let txn = book
            .add(&TransactionDraft::new(TransactionKind::Expense, "5", "2024-01-01"))
            .unwrap();
        let before = slot.contents();
        book.remove(txn.id, Persist::Defer).unwrap();
        assert!(book.is_empty());
        assert_eq!(slot.contents(), before);
        book.save().unwrap();
        assert_eq!(slot.contents().as_deref(), Some("[]"));
    }

    #[test]
    fn replace_gives_a_new_id_and_update_keeps_it() {
        let (mut book, _slot) = book();
        let draft = TransactionDraft::new(TransactionKind::Expense, "5", "2024-01-01");
        let original = book.add(&draft).unwrap();

        let edited = draft.clone().with_note("lunch");
        let updated = book.update(original.id, &edited).unwrap();
        assert_eq!(updated.id, original.id);

        let replaced = book.replace(original.id, &edited).unwrap();
        assert_ne!(replaced.id, original.id);
        assert_eq!(book.len(), 1);
        assert!(book.get(original.id).is_none());
    }

    #[test]
    fn replace_with_invalid_draft_keeps_the_original() {
        let (mut book, _slot) = book();
        let original = book
            .add(&TransactionDraft::new(TransactionKind::Expense, "5", "2024-01-01"))
            .unwrap();
        let bad = TransactionDraft::new(TransactionKind::Expense, "5", "");
        assert!(book.replace(original.id, &bad).is_err());
        assert!(book.get(original.id).is_some());
    }

    #[test]
    fn visible_ignores_unbounded_range() {
        let (mut book, _slot) = book();
        book.add(&TransactionDraft::new(TransactionKind::Income, "1", "2024-01-01"))
            .unwrap();
        assert_eq!(book.visible(Some(&DateRange::default())).len(), 1);
        let range = DateRange::parse("2024-02-01", "").unwrap();
        assert!(book.visible(Some(&range)).is_empty());
    }

    #[test]
    fn failed_saves_roll_every_mutation_back() {
        let (mut book, broken) = flaky_book();
        let kept = book
            .add(&TransactionDraft::new(TransactionKind::Income, "10", "2024-01-01"))
            .unwrap();
        broken.store(true, Ordering::SeqCst);

        let draft = TransactionDraft::new(TransactionKind::Expense, "7", "2024-01-02");
        assert!(book.add(&draft).is_err());
        assert!(book.update(kept.id, &draft).is_err());
        assert!(book.replace(kept.id, &draft).is_err());
        assert!(book.remove(kept.id, Persist::Now).is_err());
        assert!(book.clear().is_err());

        assert_eq!(book.transactions(), std::slice::from_ref(&kept));

        broken.store(false, Ordering::SeqCst);
        let next = book.add(&draft).unwrap();
        assert!(next.id > kept.id);
        assert_eq!(book.len(), 2);
    }
}
