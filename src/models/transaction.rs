//! Transaction model
//!
//! A single dated income or expense entry against one category.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::category::EntryKind;
use super::ids::{CategoryId, RecurringId, TransactionId};
use super::money::Money;

pub const MAX_DESCRIPTION_LEN: usize = 255;

/// A recorded income or expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    pub category_id: CategoryId,

    /// Always positive; direction comes from `kind`
    pub amount: Money,

    /// ISO 4217 currency code
    pub currency: String,

    /// Mirrors the kind of the category at the time of the last write
    pub kind: EntryKind,

    #[serde(default)]
    pub description: String,

    pub date: NaiveDate,

    /// Set when generated from a recurring schedule
    #[serde(default)]
    pub is_recurring: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<RecurringId>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        category_id: CategoryId,
        kind: EntryKind,
        date: NaiveDate,
        amount: Money,
        currency: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            category_id,
            amount,
            currency: currency.into(),
            kind,
            description: String::new(),
            date,
            is_recurring: false,
            recurring_id: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Signed amount: income positive, expenses negative
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }

    /// Newest first: by date, then by creation time
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        validate_amount(self.amount)?;
        validate_currency(&self.currency)?;
        validate_description(&self.description)
    }
}

/// Descriptions are at most [`MAX_DESCRIPTION_LEN`] characters
pub fn validate_description(description: &str) -> Result<(), TransactionValidationError> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(TransactionValidationError::DescriptionTooLong(len));
    }
    Ok(())
}

/// Amounts must be at least one cent and at most [`Money::MAX`]
pub fn validate_amount(amount: Money) -> Result<(), TransactionValidationError> {
    if amount.cents() < 1 {
        return Err(TransactionValidationError::NonPositiveAmount(amount));
    }
    if amount > Money::MAX {
        return Err(TransactionValidationError::AmountTooLarge(amount));
    }
    Ok(())
}

/// Currency codes are three ASCII letters
pub fn validate_currency(currency: &str) -> Result<(), TransactionValidationError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(TransactionValidationError::InvalidCurrency(currency.to_string()))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.signed_amount().format_with_currency(&self.currency),
            self.description
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    InvalidCurrency(String),
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be at least 0.01 (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} exceeds the maximum of {}", amount, Money::MAX)
            }
            Self::InvalidCurrency(code) => {
                write!(f, "Invalid currency code '{}' (expected e.g. USD)", code)
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
