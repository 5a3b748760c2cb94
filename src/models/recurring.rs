//! Recurring transaction schedules
//!
//! A schedule produces one transaction per cycle of its cadence, counted from
//! the start date, until it is paused or passes its end date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cadence::Cadence;
use super::category::EntryKind;
use super::ids::{CategoryId, RecurringId};
use super::money::Money;
use super::transaction::{
    validate_amount, validate_currency, validate_description, TransactionValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub id: RecurringId,

    pub category_id: CategoryId,

    pub amount: Money,

    pub currency: String,

    pub kind: EntryKind,

    #[serde(default)]
    pub description: String,

    pub frequency: Cadence,

    pub start_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Date of the next transaction to generate
    pub next_occurrence: NaiveDate,

    /// Number of transactions generated so far
    #[serde(default)]
    pub occurrences: u32,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl RecurringTransaction {
    pub fn new(
        category_id: CategoryId,
        kind: EntryKind,
        amount: Money,
        currency: impl Into<String>,
        frequency: Cadence,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecurringId::new(),
            category_id,
            amount,
            currency: currency.into(),
            kind,
            description: String::new(),
            frequency,
            start_date,
            end_date: None,
            next_occurrence: start_date,
            occurrences: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether an occurrence on `date` is still within the schedule
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }

    /// Whether a transaction is owed as of `as_of`
    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        self.is_active && self.next_occurrence <= as_of && self.covers(self.next_occurrence)
    }

    /// Record that the current occurrence was generated and move to the next one
    ///
    /// Deactivates the schedule once the next occurrence falls past its end date.
    pub fn mark_generated(&mut self) {
        self.occurrences = self.occurrences.saturating_add(1);
        self.next_occurrence = self.frequency.advance(self.start_date, self.occurrences);
        if !self.covers(self.next_occurrence) {
            self.is_active = false;
        }
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), RecurringValidationError> {
        validate_amount(self.amount).map_err(RecurringValidationError::Entry)?;
        validate_currency(&self.currency).map_err(RecurringValidationError::Entry)?;
        validate_description(&self.description).map_err(RecurringValidationError::Entry)?;
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(RecurringValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for RecurringTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.frequency,
            self.amount.format_with_currency(&self.currency),
            self.description
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurringValidationError {
    Entry(TransactionValidationError),
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for RecurringValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry(err) => write!(f, "{}", err),
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for RecurringValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rent() -> RecurringTransaction {
        RecurringTransaction::new(
            CategoryId::new(),
            EntryKind::Expense,
            Money::from_units(1200, 0),
            "USD",
            Cadence::Monthly,
            date(2025, 1, 31),
        )
    }

    #[test]
    fn test_due_and_advance() {
        let mut schedule = rent();
        assert!(!schedule.is_due(date(2025, 1, 30)));
        assert!(schedule.is_due(date(2025, 1, 31)));

        schedule.mark_generated();
        assert_eq!(schedule.next_occurrence, date(2025, 2, 28));
        schedule.mark_generated();
        assert_eq!(schedule.next_occurrence, date(2025, 3, 31));
        assert_eq!(schedule.occurrences, 2);
        assert!(schedule.is_active);
    }

    #[test]
    fn test_deactivates_after_end_date() {
        let mut schedule = rent();
        schedule.end_date = Some(date(2025, 2, 28));
        schedule.mark_generated();
        assert!(schedule.is_active);
        schedule.mark_generated();
        assert!(!schedule.is_active);
        assert!(!schedule.is_due(date(2025, 12, 31)));
    }

    #[test]
    fn test_validation() {
        let mut schedule = rent();
        assert!(schedule.validate().is_ok());
        schedule.end_date = Some(date(2025, 1, 1));
        assert!(matches!(
            schedule.validate(),
            Err(RecurringValidationError::EndBeforeStart { .. })
        ));
        schedule.end_date = None;
        schedule.amount = Money::zero();
        assert!(matches!(
            schedule.validate(),
            Err(RecurringValidationError::Entry(_))
        ));
    }

    #[test]
    fn test_description_limit() {
        let mut schedule = rent();
        schedule.description = "x".repeat(255);
        assert!(schedule.validate().is_ok());
        schedule.description = "x".repeat(300);
        assert_eq!(
            schedule.validate(),
            Err(RecurringValidationError::Entry(
                TransactionValidationError::DescriptionTooLong(300)
            ))
        );
    }
}
