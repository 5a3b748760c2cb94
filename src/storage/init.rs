//! First-run setup
//!
//! Seeds a starter set of income and expense categories.

use crate::config::paths::TrackerPaths;
use crate::error::TrackerError;
use crate::models::{Category, EntryKind};

use super::file_io::write_json_atomic;

const DEFAULT_CATEGORIES: &[(&str, EntryKind, &str)] = &[
    ("Groceries", EntryKind::Expense, "Daily groceries and household items"),
    ("Rent", EntryKind::Expense, "Monthly rent or mortgage"),
    ("Transportation", EntryKind::Expense, "Transit, fuel and parking"),
    ("Food & Dining", EntryKind::Expense, "Restaurants and delivery"),
    ("Utilities", EntryKind::Expense, "Electricity, water, gas"),
    ("Mobile & Internet", EntryKind::Expense, "Phone and internet bills"),
    ("Healthcare", EntryKind::Expense, "Medical expenses"),
    ("Entertainment", EntryKind::Expense, "Movies and subscriptions"),
    ("Shopping", EntryKind::Expense, "Clothing and accessories"),
    ("Education", EntryKind::Expense, "Courses and books"),
    ("Salary", EntryKind::Income, "Regular salary"),
    ("Freelance", EntryKind::Income, "Freelance income"),
    ("Investment Returns", EntryKind::Income, "Returns from investments"),
];

/// Create the data directory and seed default categories if none exist yet
///
/// Returns the number of categories created.
pub fn initialize_storage(paths: &TrackerPaths) -> Result<usize, TrackerError> {
    paths.ensure_directories()?;

    if paths.categories_file().exists() {
        return Ok(0);
    }

    let categories = default_categories();
    write_json_atomic(paths.categories_file(), &categories)?;
    tracing::info!(count = categories.len(), "seeded default categories");
    Ok(categories.len())
}

/// The starter category set
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, kind, description)| Category::new(*name, *kind).with_description(*description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_io::read_json;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_seeds_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let created = initialize_storage(&paths).unwrap();
        assert_eq!(created, DEFAULT_CATEGORIES.len());

        let stored: Vec<Category> = read_json(paths.categories_file()).unwrap();
        assert_eq!(stored.len(), created);
        assert!(stored.iter().all(|c| c.validate().is_ok()));

        assert_eq!(initialize_storage(&paths).unwrap(), 0);
    }

    #[test]
    fn test_defaults_cover_both_kinds() {
        let categories = default_categories();
        assert!(categories.iter().any(|c| c.kind == EntryKind::Income));
        assert!(categories.iter().any(|c| c.kind == EntryKind::Expense));
    }
}
