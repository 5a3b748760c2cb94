//! Budget queries

use chrono::NaiveDate;

use crate::error::TrackerError;
use crate::models::{Budget, BudgetId, Cadence, CategoryId};

use super::collection::Collection;

pub type BudgetRepository = Collection<Budget>;

impl Collection<Budget> {
    /// Active budgets on one category
    pub fn get_active_for_category(&self, category_id: CategoryId) -> Result<Vec<Budget>, TrackerError> {
        self.filter(|b| b.is_active && b.category_id == category_id)
    }

    /// Another budget occupying the same (category, cadence, start date) slot
    pub fn find_conflict(
        &self,
        category_id: CategoryId,
        cadence: Cadence,
        start_date: NaiveDate,
        exclude: Option<BudgetId>,
    ) -> Result<Option<Budget>, TrackerError> {
        self.find(|b| {
            b.category_id == category_id
                && b.cadence == cadence
                && b.start_date == start_date
                && Some(b.id) != exclude
        })
    }
}
