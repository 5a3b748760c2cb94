//! Recurring transaction service
//!
//! Schedules generate ordinary transactions through [`TransactionService`],
//! so generated expenses are audited and raise budget alerts like any other.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Cadence, CategoryId, Money, RecurringId, RecurringTransaction, Transaction};
use crate::storage::Storage;

use super::transaction::{CreateTransactionInput, TransactionService};

/// Service for recurring schedules
pub struct RecurringService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new schedule
#[derive(Debug, Clone)]
pub struct CreateRecurringInput {
    pub category_id: CategoryId,
    pub amount: Money,
    pub currency: String,
    pub frequency: Cadence,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Fields to change on an existing schedule; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct RecurringChanges {
    pub amount: Option<Money>,
    pub description: Option<String>,
    /// `Some(None)` clears the end date
    pub end_date: Option<Option<NaiveDate>>,
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new schedule; the first occurrence is the start date
    pub fn create(&self, input: CreateRecurringInput) -> TrackerResult<RecurringTransaction> {
        let category = self
            .storage
            .categories
            .get(input.category_id)?
            .ok_or_else(|| TrackerError::category_not_found(input.category_id.to_string()))?;

        let mut schedule = RecurringTransaction::new(
            category.id,
            category.kind,
            input.amount,
            input.currency,
            input.frequency,
            input.start_date,
        );
        schedule.end_date = input.end_date;
        if let Some(description) = input.description {
            schedule.description = description.trim().to_string();
        }

        schedule
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.storage.recurring.upsert(schedule.clone())?;
        self.storage.recurring.save()?;

        self.storage.log_create(
            EntityType::RecurringTransaction,
            schedule.id.to_string(),
            Some(schedule.description.clone()),
            &schedule,
        )?;

        Ok(schedule)
    }

    pub fn get(&self, id: RecurringId) -> TrackerResult<Option<RecurringTransaction>> {
        self.storage.recurring.get(id)
    }

    /// Find a schedule by full or short ID string
    pub fn find(&self, identifier: &str) -> TrackerResult<Option<RecurringTransaction>> {
        if let Ok(id) = identifier.parse::<RecurringId>() {
            if let Some(schedule) = self.storage.recurring.get(id)? {
                return Ok(Some(schedule));
            }
        }
        self.storage.recurring.find(|r| r.id.matches(identifier))
    }

    pub fn require(&self, identifier: &str) -> TrackerResult<RecurringTransaction> {
        self.find(identifier)?
            .ok_or_else(|| TrackerError::recurring_not_found(identifier))
    }

    /// All schedules ordered by next occurrence
    pub fn list(&self, include_inactive: bool) -> TrackerResult<Vec<RecurringTransaction>> {
        let mut list = self
            .storage
            .recurring
            .filter(|r| include_inactive || r.is_active)?;
        list.sort_by_key(|r| (r.next_occurrence, r.created_at));
        Ok(list)
    }

    pub fn update(&self, id: RecurringId, changes: RecurringChanges) -> TrackerResult<RecurringTransaction> {
        let mut schedule = self
            .storage
            .recurring
            .get(id)?
            .ok_or_else(|| TrackerError::recurring_not_found(id.to_string()))?;

        let before = schedule.clone();

        if let Some(amount) = changes.amount {
            schedule.amount = amount;
        }
        if let Some(description) = changes.description {
            schedule.description = description.trim().to_string();
        }
        if let Some(end_date) = changes.end_date {
            schedule.end_date = end_date;
        }
        if schedule.is_active && !schedule.covers(schedule.next_occurrence) {
            schedule.is_active = false;
        }

        schedule.updated_at = Utc::now();
        schedule
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.save_update(&before, &schedule)?;
        Ok(schedule)
    }

    /// Pause or resume a schedule
    ///
    /// A schedule whose next occurrence is already past its end date cannot
    /// be resumed.
    pub fn set_active(&self, id: RecurringId, active: bool) -> TrackerResult<RecurringTransaction> {
        let mut schedule = self
            .storage
            .recurring
            .get(id)?
            .ok_or_else(|| TrackerError::recurring_not_found(id.to_string()))?;

        if schedule.is_active == active {
            return Ok(schedule);
        }
        if active && !schedule.covers(schedule.next_occurrence) {
            return Err(TrackerError::Validation(format!(
                "Schedule {} has already ended",
                schedule.id
            )));
        }

        let before = schedule.clone();
        schedule.is_active = active;
        schedule.updated_at = Utc::now();

        self.save_update(&before, &schedule)?;
        Ok(schedule)
    }

    /// Delete a schedule; transactions it already generated are kept
    pub fn delete(&self, id: RecurringId) -> TrackerResult<RecurringTransaction> {
        let schedule = self
            .storage
            .recurring
            .delete(id)?
            .ok_or_else(|| TrackerError::recurring_not_found(id.to_string()))?;
        self.storage.recurring.save()?;

        self.storage.log_delete(
            EntityType::RecurringTransaction,
            schedule.id.to_string(),
            Some(schedule.description.clone()),
            &schedule,
        )?;

        Ok(schedule)
    }

    /// Generate every occurrence due on or before `as_of`
    ///
    /// Catches up on all missed occurrences, oldest first. Transactions are
    /// created through `transactions`, so alerts fire when it carries a
    /// notifier. A schedule whose occurrence cannot be recorded is logged and
    /// skipped until the next run.
    pub fn process_due(
        &self,
        transactions: &TransactionService<'_>,
        as_of: NaiveDate,
    ) -> TrackerResult<Vec<Transaction>> {
        let mut generated = Vec::new();

        for mut schedule in self.storage.recurring.get_due(as_of)? {
            let before = schedule.clone();

            while schedule.is_due(as_of) {
                let mut input = CreateTransactionInput::new(
                    schedule.category_id,
                    schedule.next_occurrence,
                    schedule.amount,
                    schedule.currency.clone(),
                );
                input.description = Some(schedule.description.clone());
                input.recurring_id = Some(schedule.id);

                match transactions.create(input) {
                    Ok(txn) => generated.push(txn),
                    Err(e) => {
                        // Leave the occurrence pending; other schedules still run.
                        tracing::error!(
                            schedule = %schedule.id,
                            occurrence = %schedule.next_occurrence,
                            error = %e,
                            "failed to generate recurring transaction"
                        );
                        break;
                    }
                }
                schedule.mark_generated();
            }

            if schedule.occurrences == before.occurrences {
                continue;
            }

            tracing::info!(
                schedule = %schedule.id,
                occurrences = schedule.occurrences - before.occurrences,
                next = %schedule.next_occurrence,
                active = schedule.is_active,
                "processed recurring schedule"
            );
            self.save_update(&before, &schedule)?;
        }

        Ok(generated)
    }

    fn save_update(&self, before: &RecurringTransaction, after: &RecurringTransaction) -> TrackerResult<()> {
        self.storage.recurring.upsert(after.clone())?;
        self.storage.recurring.save()?;
        self.storage.log_update(
            EntityType::RecurringTransaction,
            after.id.to_string(),
            Some(after.description.clone()),
            before,
            after,
        )
    }
}
