//! Category service
//!
//! Provides business logic for category management including CRUD
//! operations and the reference checks that guard deletion.

use crate::audit::EntityType;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, CategoryId, EntryKind};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new category
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    pub kind: EntryKind,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl CreateCategoryInput {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            icon: None,
            color: None,
        }
    }
}

/// Fields to change on an existing category; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, input: CreateCategoryInput) -> TrackerResult<Category> {
        let name = input.name.trim();
        self.ensure_unique(name, input.kind, None)?;

        let mut category = Category::new(name, input.kind);
        if let Some(description) = input.description {
            category.description = description.trim().to_string();
        }
        if let Some(icon) = input.icon {
            category.icon = icon;
        }
        if let Some(color) = input.color {
            category.color = color;
        }

        category
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        tracing::info!(category = %category.name, kind = %category.kind, "created category");
        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> TrackerResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID string
    pub fn find(&self, identifier: &str) -> TrackerResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier, None)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            if let Some(category) = self.storage.categories.get(id)? {
                return Ok(Some(category));
            }
        }

        // Short IDs as printed by `list`
        self.storage.categories.find(|c| c.id.matches(identifier))
    }

    /// Find a category or fail with a not-found error
    pub fn require(&self, identifier: &str) -> TrackerResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| TrackerError::category_not_found(identifier))
    }

    /// List categories sorted by kind then name
    pub fn list(&self, kind: Option<EntryKind>, include_inactive: bool) -> TrackerResult<Vec<Category>> {
        self.storage.categories.get_sorted(kind, include_inactive)
    }

    /// Update a category's descriptive fields
    ///
    /// The kind of a category is fixed once created.
    pub fn update(&self, id: CategoryId, changes: CategoryChanges) -> TrackerResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| TrackerError::category_not_found(id.to_string()))?;

        let before = category.clone();

        if let Some(name) = changes.name {
            let name = name.trim();
            self.ensure_unique(name, category.kind, Some(id))?;
            category.name = name.to_string();
        }
        if let Some(description) = changes.description {
            category.description = description.trim().to_string();
        }
        if let Some(icon) = changes.icon {
            category.icon = icon;
        }
        if let Some(color) = changes.color {
            category.color = color;
        }

        category.updated_at = chrono::Utc::now();
        category
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Activate or deactivate a category
    pub fn set_active(&self, id: CategoryId, active: bool) -> TrackerResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| TrackerError::category_not_found(id.to_string()))?;

        if category.is_active == active {
            return Ok(category);
        }

        let before = category.clone();
        category.is_active = active;
        category.updated_at = chrono::Utc::now();

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// Refused while any transaction, budget or recurring schedule still
    /// points at it; deactivate the category instead.
    pub fn delete(&self, id: CategoryId) -> TrackerResult<Category> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| TrackerError::category_not_found(id.to_string()))?;

        let transactions = self.storage.transactions.count(|t| t.category_id == id)?;
        let budgets = self.storage.budgets.count(|b| b.category_id == id)?;
        let schedules = self.storage.recurring.count(|r| r.category_id == id)?;

        if transactions + budgets + schedules > 0 {
            return Err(TrackerError::InUse {
                entity_type: "Category",
                identifier: category.name.clone(),
                reason: format!(
                    "{} transaction(s), {} budget(s) and {} recurring schedule(s) reference it",
                    transactions, budgets, schedules
                ),
            });
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    fn ensure_unique(&self, name: &str, kind: EntryKind, exclude: Option<CategoryId>) -> TrackerResult<()> {
        if let Some(existing) = self.storage.categories.get_by_name(name, Some(kind))? {
            if Some(existing.id) != exclude {
                return Err(TrackerError::Duplicate {
                    entity_type: "Category",
                    identifier: name.to_string(),
                });
            }
        }
        Ok(())
    }
}
