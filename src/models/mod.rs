//! Core data models for the finance tracker
//!
//! Categories, transactions, budgets and recurring schedules, plus the money
//! and date-period types they are built from.

pub mod budget;
pub mod cadence;
pub mod category;
pub mod ids;
pub mod money;
pub mod recurring;
pub mod transaction;

pub use budget::{AlertLevel, Budget, BudgetStatus, DEFAULT_ALERT_THRESHOLD};
pub use cadence::{Cadence, DateWindow};
pub use category::{Category, EntryKind};
pub use ids::{BudgetId, CategoryId, RecurringId, TransactionId};
pub use money::Money;
pub use recurring::RecurringTransaction;
pub use transaction::Transaction;
