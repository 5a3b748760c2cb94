//! Service layer for the finance tracker
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, audit logging, and cross-entity operations such as
//! budget alerts raised by transaction writes.

pub mod budget;
pub mod category;
pub mod recurring;
pub mod transaction;

pub use budget::{BudgetChanges, BudgetFilter, BudgetService, CreateBudgetInput};
pub use category::{CategoryChanges, CategoryService, CreateCategoryInput};
pub use recurring::{CreateRecurringInput, RecurringChanges, RecurringService};
pub use transaction::{
    CreateTransactionInput, TransactionChanges, TransactionFilter, TransactionService,
};
