//! Category queries

use crate::error::TrackerError;
use crate::models::{Category, EntryKind};

use super::collection::Collection;

pub type CategoryRepository = Collection<Category>;

impl Collection<Category> {
    /// Case-insensitive name lookup, optionally restricted to one kind
    pub fn get_by_name(
        &self,
        name: &str,
        kind: Option<EntryKind>,
    ) -> Result<Option<Category>, TrackerError> {
        let wanted = name.trim().to_lowercase();
        self.find(|c| c.name.to_lowercase() == wanted && kind.map_or(true, |k| c.kind == k))
    }

    /// Categories sorted by kind then name
    pub fn get_sorted(
        &self,
        kind: Option<EntryKind>,
        include_inactive: bool,
    ) -> Result<Vec<Category>, TrackerError> {
        let mut list = self.filter(|c| {
            kind.map_or(true, |k| c.kind == k) && (include_inactive || c.is_active)
        })?;
        list.sort_by(|a, b| {
            a.kind
                .as_str()
                .cmp(b.kind.as_str())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_with(categories: Vec<Category>) -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        for category in categories {
            repo.upsert(category).unwrap();
        }
        (temp_dir, repo)
    }

    #[test]
    fn test_get_by_name_is_case_insensitive() {
        let (_tmp, repo) = repo_with(vec![
            Category::new("Freelance", EntryKind::Income),
            Category::new("Freelance", EntryKind::Expense),
        ]);

        let found = repo.get_by_name("freelance", Some(EntryKind::Income)).unwrap();
        assert_eq!(found.unwrap().kind, EntryKind::Income);
        assert!(repo.get_by_name("FREELANCE", None).unwrap().is_some());
        assert!(repo.get_by_name("Rent", None).unwrap().is_none());
    }

    #[test]
    fn test_get_sorted_hides_inactive() {
        let mut hidden = Category::new("Old", EntryKind::Expense);
        hidden.is_active = false;
        let (_tmp, repo) = repo_with(vec![
            Category::new("rent", EntryKind::Expense),
            Category::new("Groceries", EntryKind::Expense),
            Category::new("Salary", EntryKind::Income),
            hidden,
        ]);

        let names: Vec<String> = repo
            .get_sorted(None, false)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Groceries", "rent", "Salary"]);
        assert_eq!(repo.get_sorted(Some(EntryKind::Expense), true).unwrap().len(), 3);
    }
}
