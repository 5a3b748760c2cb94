//! At-a-glance dashboard for one window

use chrono::NaiveDate;

use crate::error::TrackerResult;
use crate::models::{DateWindow, Transaction};
use crate::storage::Storage;

use super::summary::PeriodSummary;

const DASHBOARD_TOP_CATEGORIES: usize = 10;
const DASHBOARD_RECENT: usize = 10;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: PeriodSummary,
    /// Newest first, across all dates
    pub recent_transactions: Vec<Transaction>,
    pub active_categories: usize,
    pub active_budgets: usize,
}

impl Dashboard {
    pub fn generate(storage: &Storage, window: DateWindow) -> TrackerResult<Self> {
        Ok(Self {
            summary: PeriodSummary::generate(storage, window, DASHBOARD_TOP_CATEGORIES)?,
            recent_transactions: storage.transactions.get_recent(DASHBOARD_RECENT)?,
            active_categories: storage.categories.count(|c| c.is_active)?,
            active_budgets: storage.budgets.count(|b| b.is_active)?,
        })
    }

    /// Dashboard for the calendar month containing `today`
    pub fn current_month(storage: &Storage, today: NaiveDate) -> TrackerResult<Self> {
        Self::generate(storage, DateWindow::month_of(today))
    }
}
