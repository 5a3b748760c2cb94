//! Display formatting for terminal output
//!
//! Lists are rendered as `tabled` tables; details and reports as aligned
//! text blocks.

pub mod audit;
pub mod budget;
pub mod category;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use audit::format_history;
pub use budget::{format_budget_details, format_budget_list, format_budget_statuses};
pub use category::{format_category_details, format_category_list};
pub use recurring::format_recurring_list;
pub use report::{format_dashboard, format_financial_report, format_summary, format_trend};
pub use transaction::{format_transaction_details, format_transaction_register};
