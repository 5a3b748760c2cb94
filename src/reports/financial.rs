//! Financial report: a period summary plus the budgets needing attention

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::TrackerResult;
use crate::models::{BudgetStatus, DateWindow};
use crate::services::BudgetService;
use crate::storage::Storage;

use super::range::ReportRange;
use super::summary::PeriodSummary;

/// Categories listed per kind in a financial report
pub const REPORT_TOP_CATEGORIES: usize = 5;

/// A budget at or past its alert threshold
#[derive(Debug, Clone)]
pub struct BudgetAlertLine {
    pub category_name: String,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone)]
pub struct FinancialReport {
    pub range: ReportRange,
    pub window: DateWindow,
    pub summary: PeriodSummary,
    /// Evaluated as of the last day of the window
    pub budget_alerts: Vec<BudgetAlertLine>,
    pub generated_at: DateTime<Utc>,
}

impl FinancialReport {
    pub fn generate(storage: &Storage, range: ReportRange, today: NaiveDate) -> TrackerResult<Self> {
        let window = range.window(today);
        let summary = PeriodSummary::generate(storage, window, REPORT_TOP_CATEGORIES)?;

        let mut budget_alerts = Vec::new();
        for status in BudgetService::new(storage).evaluate_active(window.end)? {
            if !status.needs_notification() {
                continue;
            }
            let category_name = storage
                .categories
                .get(status.category_id)?
                .map(|c| c.name)
                .unwrap_or_else(|| status.category_id.to_string());
            budget_alerts.push(BudgetAlertLine {
                category_name,
                status,
            });
        }

        Ok(Self {
            range,
            window,
            summary,
            budget_alerts,
            generated_at: Utc::now(),
        })
    }

    /// "Monthly Financial Report", "Custom Financial Report", ...
    pub fn title(&self) -> String {
        format!("{} Financial Report", self.range.label())
    }
}
