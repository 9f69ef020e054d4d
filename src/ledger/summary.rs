use std::{cmp::Reverse, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::{parse_date, Transaction, DATE_FORMAT};
use crate::errors::ValidationError;

/// Income, expense and balance over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

/// Sums saturate at `i64::MAX`. Both sums are non-negative, so the balance
/// never overflows and always equals `income - expense`.
pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let (income, expense) =
        transactions
            .iter()
            .fold((0i64, 0i64), |(income, expense), txn| {
                let amount = txn.amount_i64();
                if txn.is_income() {
                    (income.saturating_add(amount), expense)
                } else {
                    (income, expense.saturating_add(amount))
                }
            });
    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

/// Newest date first; entries on the same day newest-created first.
pub fn sort_for_display(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by_key(|txn| (Reverse(txn.date), Reverse(txn.id)));
    sorted
}

/// Inclusive date bounds; a missing side is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Parses filter input where blank text means "no bound".
    pub fn parse(from: &str, to: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            from: parse_bound(from)?,
            to: parse_bound(to)?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|txn| self.contains(txn.date))
            .cloned()
            .collect()
    }
}

/// `2024-01-01..2024-01-31`; an open side is left blank (`..2024-01-31`).
impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |bound: Option<NaiveDate>| {
            bound
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        write!(f, "{}..{}", side(self.from), side(self.to))
    }
}

fn parse_bound(input: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(None);
    }
    parse_date(trimmed).map(Some)
}
