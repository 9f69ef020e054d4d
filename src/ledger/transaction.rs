use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest accepted amount in whole units. Keeps every total well inside `i64`.
pub const MAX_AMOUNT: u64 = 1_000_000_000_000_000;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" | "+" => Ok(TransactionKind::Income),
            "expense" | "out" | "-" => Ok(TransactionKind::Expense),
            other => Err(ValidationError::InvalidKind(other.to_string())),
        }
    }
}

/// One recorded income or expense event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: u64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub note: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// The amount as a signed value for totals and display.
    pub fn amount_i64(&self) -> i64 {
        i64::try_from(self.amount).unwrap_or(i64::MAX)
    }
}

/// Validated transaction fields, waiting for an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    pub kind: TransactionKind,
    pub amount: u64,
    pub category: String,
    pub note: String,
    pub date: NaiveDate,
}

impl ValidEntry {
    pub fn into_transaction(self, id: u64) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            note: self.note,
            date: self.date,
        }
    }

    pub(crate) fn apply_to(self, transaction: &mut Transaction) {
        transaction.kind = self.kind;
        transaction.amount = self.amount;
        transaction.category = self.category;
        transaction.note = self.note;
        transaction.date = self.date;
    }
}

/// Raw user input for a new or edited transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: String,
    pub category: String,
    pub note: String,
    pub date: String,
}

impl TransactionDraft {
    pub fn new(kind: TransactionKind, amount: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            kind,
            amount: amount.into(),
            category: String::new(),
            note: String::new(),
            date: date.into(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Prefills a draft from an existing entry, as the edit form does.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            kind: transaction.kind,
            amount: transaction.amount.to_string(),
            category: transaction.category.clone(),
            note: transaction.note.clone(),
            date: transaction.date.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn validate(&self) -> Result<ValidEntry, ValidationError> {
        let date = parse_date(&self.date)?;
        let amount = parse_amount(&self.amount)?;
        Ok(ValidEntry {
            kind: self.kind,
            amount,
            category: self.category.trim().to_string(),
            note: self.note.trim().to_string(),
            date,
        })
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

/// Parses an amount, rounding to the nearest whole unit.
pub fn parse_amount(input: &str) -> Result<u64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingAmount);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidAmount(trimmed.to_string()));
    }
    let rounded = value.round();
    if value <= 0.0 || rounded < 1.0 {
        return Err(ValidationError::NonPositiveAmount(trimmed.to_string()));
    }
    if rounded > MAX_AMOUNT as f64 {
        return Err(ValidationError::AmountTooLarge(trimmed.to_string()));
    }
    Ok(rounded as u64)
}
