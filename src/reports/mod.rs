//! Reports
//!
//! Period summaries, the emailed financial report, the dashboard and the
//! monthly trend. Rendering lives in `display::report`.

pub mod dashboard;
pub mod financial;
pub mod range;
pub mod summary;
pub mod trend;

pub use dashboard::Dashboard;
pub use financial::{BudgetAlertLine, FinancialReport};
pub use range::ReportRange;
pub use summary::{CategoryTotal, PeriodSummary};
pub use trend::{MonthTotals, MonthlyTrend, DEFAULT_TREND_MONTHS};
