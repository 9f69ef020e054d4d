//! Ledger domain model: transactions, totals, filtering, and the storage-bound book.

pub mod book;
pub mod clock;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod summary;
pub mod transaction;

pub use book::{LedgerBook, Persist};
pub use clock::{Clock, IdGenerator, ManualClock, SystemClock};
pub use ledger::Ledger;
pub use summary::{compute_totals, sort_for_display, DateRange, Totals};
pub use transaction::{
    parse_amount, parse_date, Transaction, TransactionDraft, TransactionKind, ValidEntry,
    DATE_FORMAT, MAX_AMOUNT,
};
