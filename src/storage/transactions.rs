//! Transaction queries

use chrono::NaiveDate;

use crate::error::TrackerError;
use crate::models::{CategoryId, DateWindow, EntryKind, Money, Transaction};

use super::collection::Collection;

pub type TransactionRepository = Collection<Transaction>;

impl Collection<Transaction> {
    /// Transactions in a category, newest first
    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Transaction>, TrackerError> {
        let mut list = self.filter(|t| t.category_id == category_id)?;
        list.sort_by(Transaction::newest_first);
        Ok(list)
    }

    /// Transactions dated inside `window` (both ends inclusive), newest first
    pub fn get_in_window(&self, window: DateWindow) -> Result<Vec<Transaction>, TrackerError> {
        let mut list = self.filter(|t| window.contains(t.date))?;
        list.sort_by(Transaction::newest_first);
        Ok(list)
    }

    /// Sum of one kind of transaction in a category over `window`
    pub fn total_for_category(
        &self,
        category_id: CategoryId,
        kind: EntryKind,
        window: DateWindow,
    ) -> Result<Money, TrackerError> {
        let items = self.read()?;
        Ok(items
            .values()
            .filter(|t| t.category_id == category_id && t.kind == kind && window.contains(t.date))
            .map(|t| t.amount)
            .sum())
    }

    /// The `limit` most recent transactions
    pub fn get_recent(&self, limit: usize) -> Result<Vec<Transaction>, TrackerError> {
        let mut list = self.get_all()?;
        list.sort_by(Transaction::newest_first);
        list.truncate(limit);
        Ok(list)
    }

    /// Earliest transaction date, if any
    pub fn first_date(&self) -> Result<Option<NaiveDate>, TrackerError> {
        Ok(self.read()?.values().map(|t| t.date).min())
    }
}
