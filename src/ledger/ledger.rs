use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::{
    clock::IdGenerator,
    summary::{compute_totals, DateRange, Totals},
    transaction::{Transaction, ValidEntry, MAX_AMOUNT},
};
use crate::errors::LedgerError;

/// In-memory list of transactions. Storage is handled by [`super::LedgerBook`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    ids: IdGenerator,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from stored entries, dropping any that break the
    /// ledger invariants. Returns a warning per dropped entry.
    pub fn from_transactions(transactions: Vec<Transaction>) -> (Self, Vec<String>) {
        let mut ledger = Self::new();
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();
        for txn in transactions {
            if txn.amount == 0 {
                warnings.push(format!("transaction {} dropped: amount must be > 0", txn.id));
                continue;
            }
            if txn.amount > MAX_AMOUNT {
                warnings.push(format!(
                    "transaction {} dropped: amount exceeds {MAX_AMOUNT}",
                    txn.id
                ));
                continue;
            }
            if !seen.insert(txn.id) {
                warnings.push(format!("transaction {} dropped: duplicate id", txn.id));
                continue;
            }
            ledger.ids.observe(txn.id);
            ledger.transactions.push(txn);
        }
        (ledger, warnings)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn add(&mut self, entry: ValidEntry, now: DateTime<Utc>) -> &Transaction {
        let id = self.ids.next(now);
        self.transactions.push(entry.into_transaction(id));
        &self.transactions[self.transactions.len() - 1]
    }

    /// Removes the entry with `id`; absent ids are not an error.
    pub fn remove(&mut self, id: u64) -> Option<Transaction> {
        let idx = self.transactions.iter().position(|txn| txn.id == id)?;
        Some(self.transactions.remove(idx))
    }

    /// Rewrites the entry with `id` in place, keeping its id.
    pub fn update(&mut self, id: u64, entry: ValidEntry) -> Result<&Transaction, LedgerError> {
        let txn = self
            .transactions
            .iter_mut()
            .find(|txn| txn.id == id)
            .ok_or(LedgerError::TransactionNotFound(id))?;
        entry.apply_to(txn);
        Ok(txn)
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.transactions.len();
        self.transactions.clear();
        removed
    }

    pub fn filter_by_date_range(&self, range: &DateRange) -> Vec<Transaction> {
        range.apply(&self.transactions)
    }

    pub fn totals(&self) -> Totals {
        compute_totals(&self.transactions)
    }
}
