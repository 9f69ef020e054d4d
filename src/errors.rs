use thiserror::Error;

/// Rejections raised while turning user input into a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("date is required (use YYYY-MM-DD)")]
    MissingDate,
    #[error("invalid date `{0}` (use YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("amount is required")]
    MissingAmount,
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("amount must be greater than 0 (got `{0}`)")]
    NonPositiveAmount(String),
    #[error("amount `{0}` is larger than the maximum of 1000000000000000")]
    AmountTooLarge(String),
    #[error("unknown transaction type `{0}` (use income or expense)")]
    InvalidKind(String),
}

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(u64),
    #[error("Nothing to export")]
    NothingToExport,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    /// True for errors the user can fix by changing their input.
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}
