//! Month-by-month income and expense trend

use chrono::{Datelike, Months, NaiveDate};

use crate::error::TrackerResult;
use crate::models::{DateWindow, EntryKind, Money};
use crate::storage::Storage;

pub const DEFAULT_TREND_MONTHS: u32 = 12;

/// Totals for one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotals {
    pub window: DateWindow,
    pub income: Money,
    pub expenses: Money,
    pub savings: Money,
}

impl MonthTotals {
    /// "2025-03"
    pub fn label(&self) -> String {
        self.window.start.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone)]
pub struct MonthlyTrend {
    /// Oldest first, ending with the month containing "today"
    pub months: Vec<MonthTotals>,
}

impl MonthlyTrend {
    pub fn generate(storage: &Storage, today: NaiveDate, months: u32) -> TrackerResult<Self> {
        let current = today.with_day(1).unwrap_or(today);
        let transactions = storage.transactions.get_all()?;

        let mut result = Vec::with_capacity(months as usize);
        for back in (0..months).rev() {
            let Some(start) = current.checked_sub_months(Months::new(back)) else {
                continue;
            };
            let window = DateWindow::month_of(start);

            let mut income = Money::zero();
            let mut expenses = Money::zero();
            for txn in transactions.iter().filter(|t| window.contains(t.date)) {
                match txn.kind {
                    EntryKind::Income => income += txn.amount,
                    EntryKind::Expense => expenses += txn.amount,
                }
            }

            result.push(MonthTotals {
                window,
                income,
                expenses,
                savings: income - expenses,
            });
        }

        Ok(Self { months: result })
    }

    pub fn total_savings(&self) -> Money {
        self.months.iter().map(|m| m.savings).sum()
    }
}
