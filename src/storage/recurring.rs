//! Recurring schedule queries

use chrono::NaiveDate;

use crate::error::TrackerError;
use crate::models::RecurringTransaction;

use super::collection::Collection;

pub type RecurringRepository = Collection<RecurringTransaction>;

impl Collection<RecurringTransaction> {
    /// Schedules owing at least one transaction as of `as_of`
    pub fn get_due(&self, as_of: NaiveDate) -> Result<Vec<RecurringTransaction>, TrackerError> {
        let mut due = self.filter(|r| r.is_due(as_of))?;
        due.sort_by_key(|r| (r.next_occurrence, r.id));
        Ok(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cadence, CategoryId, EntryKind, Money};
    use tempfile::TempDir;

    #[test]
    fn test_get_due() {
        let temp_dir = TempDir::new().unwrap();
        let repo = RecurringRepository::new(temp_dir.path().join("r.json"));
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let schedule = |start: NaiveDate| {
            RecurringTransaction::new(
                CategoryId::new(),
                EntryKind::Expense,
                Money::from_cents(999),
                "USD",
                Cadence::Monthly,
                start,
            )
        };

        repo.upsert(schedule(start)).unwrap();
        repo.upsert(schedule(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()))
            .unwrap();
        let mut paused = schedule(start);
        paused.is_active = false;
        repo.upsert(paused).unwrap();

        let due = repo.get_due(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].next_occurrence, start);
    }
}
