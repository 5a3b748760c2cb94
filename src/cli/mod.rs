//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod category;
pub mod profile;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use profile::{handle_profile_command, ProfileCommands};
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::error::TrackerResult;
use crate::models::{BudgetStatus, CategoryId, Money};
use crate::storage::Storage;

/// clap value parser for amounts such as `12.50` or `$1,200`
pub fn parse_money(s: &str) -> Result<Money, String> {
    let amount = Money::parse(s).map_err(|e| e.to_string())?;
    if !amount.is_positive() {
        return Err("amount must be greater than zero".to_string());
    }
    Ok(amount)
}

/// clap value parser for `YYYY-MM-DD` dates
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}

/// The local calendar date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// A `--currency` argument normalized to an upper-case code, or the profile
/// currency when absent
pub(crate) fn currency_or_default(currency: Option<String>, settings: &Settings) -> String {
    match currency {
        Some(code) => code.trim().to_uppercase(),
        None => settings.currency().to_string(),
    }
}

/// One line per budget a write pushed to or past its alert threshold
pub(crate) fn format_alert_lines(category_name: &str, alerts: &[BudgetStatus]) -> String {
    alerts
        .iter()
        .map(|status| {
            format!(
                "  [{}] {} budget: {} of {} used ({:.1}%)\n",
                status.alert_level(),
                category_name,
                status.spent.format_with_currency(&status.currency),
                status.amount.format_with_currency(&status.currency),
                status.percentage_used
            )
        })
        .collect()
}

/// Category names keyed by id, for tables
pub(crate) fn category_names(storage: &Storage) -> TrackerResult<HashMap<CategoryId, String>> {
    Ok(storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("12.50").unwrap(), Money::from_cents(1_250));
        assert_eq!(parse_money("$1,200").unwrap(), Money::from_cents(120_000));
        assert!(parse_money("0").is_err());
        assert!(parse_money("-5").is_err());
        assert!(parse_money("abc").is_err());
    }

    #[test]
    fn test_currency_or_default() {
        let settings = Settings::default();
        assert_eq!(currency_or_default(Some(" eur ".into()), &settings), "EUR");
        assert_eq!(currency_or_default(None, &settings), "USD");
    }

    #[test]
    fn test_format_alert_lines() {
        use crate::models::{Budget, Cadence, DateWindow};

        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let budget = Budget::new(CategoryId::new(), Money::from_cents(50_000), "USD", Cadence::Monthly, start);
        let status = BudgetStatus::evaluate(&budget, DateWindow::month_of(start), Money::from_cents(45_000));

        let lines = format_alert_lines("Groceries", &[status]);
        assert_eq!(lines, "  [WARNING] Groceries budget: USD 450.00 of USD 500.00 used (90.0%)\n");
        assert!(format_alert_lines("Groceries", &[]).is_empty());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("28/02/2025").is_err());
    }
}
