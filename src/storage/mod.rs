//! Storage layer
//!
//! One JSON file per record type under the data directory, each loaded into
//! an in-memory [`Collection`]. The [`Storage`] coordinator owns the
//! collections and the audit log.

pub mod budgets;
pub mod categories;
pub mod collection;
pub mod file_io;
pub mod init;
pub mod recurring;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use collection::{Collection, Record};
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use recurring::RecurringRepository;
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TrackerPaths;
use crate::error::TrackerError;

pub struct Storage {
    paths: TrackerPaths,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub recurring: RecurringRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a storage coordinator; nothing is read until `load_all`
    pub fn new(paths: TrackerPaths) -> Result<Self, TrackerError> {
        paths.ensure_directories()?;

        Ok(Self {
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            recurring: RecurringRepository::new(paths.recurring_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&mut self) -> Result<(), TrackerError> {
        self.categories.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        self.recurring.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> Result<(), TrackerError> {
        self.categories.save()?;
        self.transactions.save()?;
        self.budgets.save()?;
        self.recurring.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TrackerError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), TrackerError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TrackerError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Category, EntryKind};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_all_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        storage
            .categories
            .upsert(Category::new("Rent", EntryKind::Expense))
            .unwrap();
        storage.save_all().unwrap();

        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.categories.len().unwrap(), 1);
        assert!(reopened.transactions.is_empty().unwrap());
    }

    #[test]
    fn test_audit_helpers() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let before = Category::new("Rent", EntryKind::Expense);
        let mut after = before.clone();
        after.name = "Housing".into();

        storage
            .log_create(EntityType::Category, before.id.to_string(), None, &before)
            .unwrap();
        storage
            .log_update(EntityType::Category, after.id.to_string(), None, &before, &after)
            .unwrap();
        storage
            .log_delete(EntityType::Category, after.id.to_string(), None, &after)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        let ops: Vec<Operation> = entries.iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("name: \"Rent\" -> \"Housing\"")
        );
    }
}
