//! Budget model and budget evaluation
//!
//! A budget caps spending in one expense category over a repeating period.
//! Evaluating a budget against the amount spent in its current period yields
//! a [`BudgetStatus`] carrying the derived figures that drive alerts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cadence::{Cadence, DateWindow};
use super::ids::{BudgetId, CategoryId};
use super::money::Money;
use super::transaction::validate_currency;

/// Default percentage at which a warning is raised
pub const DEFAULT_ALERT_THRESHOLD: u8 = 80;

/// A spending limit for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub category_id: CategoryId,

    /// Limit per period
    pub amount: Money,

    pub currency: String,

    #[serde(default)]
    pub cadence: Cadence,

    /// First day of the first period
    pub start_date: NaiveDate,

    /// When set, the budget covers exactly `start_date..=end_date` and does not repeat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Percentage of the limit at which to warn
    #[serde(default = "default_threshold")]
    pub alert_threshold: u8,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_threshold() -> u8 {
    DEFAULT_ALERT_THRESHOLD
}

fn default_active() -> bool {
    true
}

impl Budget {
    /// Create a new active budget with the default alert threshold
    pub fn new(
        category_id: CategoryId,
        amount: Money,
        currency: impl Into<String>,
        cadence: Cadence,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            category_id,
            amount,
            currency: currency.into(),
            cadence,
            start_date,
            end_date: None,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// The period that `as_of` falls in
    ///
    /// A budget with an end date has a single fixed window. Otherwise periods
    /// repeat from the start date, and dates before the start map to the
    /// first period.
    pub fn window_for(&self, as_of: NaiveDate) -> DateWindow {
        match self.end_date {
            Some(end) => DateWindow {
                start: self.start_date,
                end: end.max(self.start_date),
            },
            None => self.cadence.window_containing(self.start_date, as_of),
        }
    }

    /// Last day of the first period
    pub fn period_end(&self) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| self.cadence.period_end(self.start_date))
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.amount.cents() < 1 {
            return Err(BudgetValidationError::NonPositiveAmount(self.amount));
        }
        if self.amount > Money::MAX {
            return Err(BudgetValidationError::AmountTooLarge(self.amount));
        }
        if validate_currency(&self.currency).is_err() {
            return Err(BudgetValidationError::InvalidCurrency(self.currency.clone()));
        }
        if !(1..=100).contains(&self.alert_threshold) {
            return Err(BudgetValidationError::ThresholdOutOfRange(self.alert_threshold));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(BudgetValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

/// How urgent a budget's state is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Ok,
    Warning,
    Exceeded,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Exceeded => write!(f, "EXCEEDED"),
        }
    }
}

/// A budget evaluated against actual spending in one period
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget_id: BudgetId,
    pub category_id: CategoryId,
    pub currency: String,
    pub window: DateWindow,
    pub amount: Money,
    pub spent: Money,
    pub remaining: Money,
    pub percentage_used: f64,
    pub alert_threshold: u8,
    pub is_over_budget: bool,
    pub should_alert: bool,
}

impl BudgetStatus {
    /// Derive the status of `budget` for `window` given what was spent in it
    pub fn evaluate(budget: &Budget, window: DateWindow, spent: Money) -> Self {
        let amount = budget.amount;
        let threshold = i128::from(budget.alert_threshold);

        // Compare in cents so 80% of 50.00 is exactly 40.00. A zero limit
        // reports 0% used, which never reaches a threshold of at least 1.
        let should_alert = if amount.is_zero() {
            threshold == 0
        } else {
            i128::from(spent.cents()) * 100 >= threshold * i128::from(amount.cents())
        };

        Self {
            budget_id: budget.id,
            category_id: budget.category_id,
            currency: budget.currency.clone(),
            window,
            amount,
            spent,
            remaining: amount - spent,
            percentage_used: spent.percent_of(amount),
            alert_threshold: budget.alert_threshold,
            is_over_budget: spent > amount,
            should_alert,
        }
    }

    /// Whether a write touching this budget should notify the user
    pub fn needs_notification(&self) -> bool {
        self.should_alert || self.is_over_budget
    }

    pub fn alert_level(&self) -> AlertLevel {
        if self.is_over_budget {
            AlertLevel::Exceeded
        } else if self.should_alert {
            AlertLevel::Warning
        } else {
            AlertLevel::Ok
        }
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    InvalidCurrency(String),
    ThresholdOutOfRange(u8),
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be at least 0.01 (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Budget amount {} exceeds the maximum of {}", amount, Money::MAX)
            }
            Self::InvalidCurrency(code) => {
                write!(f, "Invalid currency code '{}' (expected e.g. USD)", code)
            }
            Self::ThresholdOutOfRange(value) => {
                write!(f, "Alert threshold must be between 1 and 100 (got {})", value)
            }
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_budget(cents: i64) -> Budget {
        Budget::new(
            CategoryId::new(),
            Money::from_cents(cents),
            "USD",
            Cadence::Monthly,
            date(2025, 1, 1),
        )
    }

    #[test]
    fn test_status_under_threshold() {
        let budget = monthly_budget(50_000);
        let window = budget.window_for(date(2025, 1, 10));
        let status = BudgetStatus::evaluate(&budget, window, Money::from_cents(10_000));

        assert_eq!(status.remaining.cents(), 40_000);
        assert!((status.percentage_used - 20.0).abs() < 1e-9);
        assert!(!status.should_alert);
        assert!(!status.is_over_budget);
        assert!(!status.needs_notification());
        assert_eq!(status.alert_level(), AlertLevel::Ok);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let budget = monthly_budget(5_000);
        let window = budget.window_for(date(2025, 1, 10));

        let at = BudgetStatus::evaluate(&budget, window, Money::from_cents(4_000));
        assert!(at.should_alert);
        assert!(!at.is_over_budget);
        assert_eq!(at.alert_level(), AlertLevel::Warning);

        let below = BudgetStatus::evaluate(&budget, window, Money::from_cents(3_999));
        assert!(!below.should_alert);
    }

    #[test]
    fn test_over_budget_is_strict() {
        let budget = monthly_budget(5_000);
        let window = budget.window_for(date(2025, 1, 10));

        let exact = BudgetStatus::evaluate(&budget, window, Money::from_cents(5_000));
        assert!(!exact.is_over_budget);
        assert!(exact.should_alert);

        let over = BudgetStatus::evaluate(&budget, window, Money::from_cents(5_001));
        assert!(over.is_over_budget);
        assert_eq!(over.remaining.cents(), -1);
        assert_eq!(over.alert_level(), AlertLevel::Exceeded);
    }

    #[test]
    fn test_zero_amount_reports_zero_percent() {
        let mut budget = monthly_budget(1);
        budget.amount = Money::zero();
        let window = budget.window_for(date(2025, 1, 1));
        let status = BudgetStatus::evaluate(&budget, window, Money::from_cents(100));
        assert_eq!(status.percentage_used, 0.0);
        assert!(!status.should_alert);
        assert!(status.is_over_budget);
    }

    #[test]
    fn test_window_for_recurring_budget() {
        let budget = monthly_budget(5_000);
        let window = budget.window_for(date(2025, 4, 20));
        assert_eq!(window.start, date(2025, 4, 1));
        assert_eq!(window.end, date(2025, 4, 30));
        assert_eq!(budget.period_end(), date(2025, 1, 31));
    }

    #[test]
    fn test_window_for_fixed_budget() {
        let mut budget = monthly_budget(5_000);
        budget.end_date = Some(date(2025, 3, 15));
        let window = budget.window_for(date(2025, 8, 1));
        assert_eq!(window.start, date(2025, 1, 1));
        assert_eq!(window.end, date(2025, 3, 15));
        assert_eq!(budget.period_end(), date(2025, 3, 15));
    }

    #[test]
    fn test_weekly_window() {
        let budget = Budget::new(
            CategoryId::new(),
            Money::from_cents(100),
            "USD",
            Cadence::Weekly,
            date(2025, 1, 6),
        );
        let window = budget.window_for(date(2025, 1, 6));
        assert_eq!(window.end, date(2025, 1, 12));
        assert!(!window.contains(date(2025, 1, 13)));
    }

    #[test]
    fn test_validation() {
        let mut budget = monthly_budget(5_000);
        assert!(budget.validate().is_ok());

        budget.alert_threshold = 0;
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::ThresholdOutOfRange(0))
        );
        budget.alert_threshold = 101;
        assert!(budget.validate().is_err());
        budget.alert_threshold = 100;

        budget.end_date = Some(date(2024, 12, 31));
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::EndBeforeStart { .. })
        ));
        budget.end_date = None;

        budget.amount = Money::zero();
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_amount_cap_and_currency() {
        let mut budget = monthly_budget(5_000);
        budget.amount = Money::MAX;
        assert!(budget.validate().is_ok());

        budget.amount = Money::from_cents(Money::MAX.cents() + 1);
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::AmountTooLarge(_))
        ));

        budget.amount = Money::from_cents(5_000);
        budget.currency = "xx".into();
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::InvalidCurrency("xx".into()))
        );
    }
}
