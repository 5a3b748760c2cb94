//! Transaction service
//!
//! Provides business logic for transaction management including CRUD
//! operations and budget alert dispatch after every create or update.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    BudgetStatus, CategoryId, EntryKind, Money, RecurringId, Transaction, TransactionId,
};
use crate::notify::NotificationService;
use crate::storage::Storage;

use super::budget::BudgetService;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    notifier: Option<&'a NotificationService>,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by category
    pub category_id: Option<CategoryId>,
    /// Filter by income or expense
    pub kind: Option<EntryKind>,
    /// Filter by date range start
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by category
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Filter by kind
    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
///
/// The kind is taken from the category, never from the caller.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub category_id: CategoryId,
    pub date: NaiveDate,
    pub amount: Money,
    pub currency: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub recurring_id: Option<RecurringId>,
}

impl CreateTransactionInput {
    pub fn new(category_id: CategoryId, date: NaiveDate, amount: Money, currency: impl Into<String>) -> Self {
        Self {
            category_id,
            date,
            amount,
            currency: currency.into(),
            description: None,
            notes: None,
            recurring_id: None,
        }
    }
}

/// Fields to change on an existing transaction; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub category_id: Option<CategoryId>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

impl<'a> TransactionService<'a> {
    /// Create a transaction service that does not send alerts
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            notifier: None,
        }
    }

    /// Create a transaction service that emails budget alerts
    pub fn with_notifier(storage: &'a Storage, notifier: &'a NotificationService) -> Self {
        Self {
            storage,
            notifier: Some(notifier),
        }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> TrackerResult<Transaction> {
        self.create_with_alerts(input).map(|(txn, _)| txn)
    }

    /// Create a transaction and return the budgets it left at or over
    /// their alert threshold
    pub fn create_with_alerts(
        &self,
        input: CreateTransactionInput,
    ) -> TrackerResult<(Transaction, Vec<BudgetStatus>)> {
        let category = self
            .storage
            .categories
            .get(input.category_id)?
            .ok_or_else(|| TrackerError::category_not_found(input.category_id.to_string()))?;

        let mut txn = Transaction::new(
            category.id,
            category.kind,
            input.date,
            input.amount,
            input.currency,
        );
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        if let Some(notes) = input.notes {
            txn.notes = notes;
        }
        if let Some(recurring_id) = input.recurring_id {
            txn.is_recurring = true;
            txn.recurring_id = Some(recurring_id);
        }

        txn.validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, category.name)),
            &txn,
        )?;

        tracing::info!(
            id = %txn.id,
            category = %category.name,
            amount = %txn.amount,
            date = %txn.date,
            "created transaction"
        );

        let alerts = self.dispatch_alerts(&txn, &category.name);
        Ok((txn, alerts))
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> TrackerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full or short ID string
    pub fn find(&self, identifier: &str) -> TrackerResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            if let Some(txn) = self.storage.transactions.get(id)? {
                return Ok(Some(txn));
            }
        }
        self.storage.transactions.find(|t| t.id.matches(identifier))
    }

    /// Find a transaction or fail with a not-found error
    pub fn require(&self, identifier: &str) -> TrackerResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| TrackerError::transaction_not_found(identifier))
    }

    /// List transactions newest first with optional filtering
    pub fn list(&self, filter: TransactionFilter) -> TrackerResult<Vec<Transaction>> {
        let mut transactions = if let Some(category_id) = filter.category_id {
            self.storage.transactions.get_by_category(category_id)?
        } else {
            let mut all = self.storage.transactions.get_all()?;
            all.sort_by(Transaction::newest_first);
            all
        };

        if let Some(kind) = filter.kind {
            transactions.retain(|t| t.kind == kind);
        }
        if let Some(start) = filter.start_date {
            transactions.retain(|t| t.date >= start);
        }
        if let Some(end) = filter.end_date {
            transactions.retain(|t| t.date <= end);
        }

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Update a transaction
    ///
    /// Moving a transaction to another category also takes that category's kind.
    pub fn update(&self, id: TransactionId, changes: TransactionChanges) -> TrackerResult<Transaction> {
        self.update_with_alerts(id, changes).map(|(txn, _)| txn)
    }

    /// Update a transaction and return the budgets it left at or over their
    /// alert threshold
    pub fn update_with_alerts(
        &self,
        id: TransactionId,
        changes: TransactionChanges,
    ) -> TrackerResult<(Transaction, Vec<BudgetStatus>)> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| TrackerError::transaction_not_found(id.to_string()))?;

        let before = txn.clone();

        let category_id = changes.category_id.unwrap_or(txn.category_id);
        let category = self
            .storage
            .categories
            .get(category_id)?
            .ok_or_else(|| TrackerError::category_not_found(category_id.to_string()))?;
        txn.category_id = category.id;
        txn.kind = category.kind;

        if let Some(date) = changes.date {
            txn.date = date;
        }
        if let Some(amount) = changes.amount {
            txn.amount = amount;
        }
        if let Some(description) = changes.description {
            txn.description = description.trim().to_string();
        }
        if let Some(notes) = changes.notes {
            txn.notes = notes;
        }

        txn.updated_at = Utc::now();
        txn.validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, category.name)),
            &before,
            &txn,
        )?;

        let alerts = self.dispatch_alerts(&txn, &category.name);
        Ok((txn, alerts))
    }

    /// Delete a transaction; no alerts are sent
    pub fn delete(&self, id: TransactionId) -> TrackerResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| TrackerError::transaction_not_found(id.to_string()))?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &txn,
        )?;

        Ok(txn)
    }

    /// Total number of transactions
    pub fn count(&self) -> TrackerResult<usize> {
        self.storage.transactions.len()
    }

    /// Budgets this transaction leaves at or over their threshold, each
    /// emailed when a notifier is attached. The write has already been
    /// persisted, so nothing here can fail it.
    fn dispatch_alerts(&self, txn: &Transaction, category_name: &str) -> Vec<BudgetStatus> {
        if !txn.is_expense() {
            return Vec::new();
        }

        let triggered = match BudgetService::new(self.storage).triggered_by(txn) {
            Ok(triggered) => triggered,
            Err(e) => {
                tracing::error!(id = %txn.id, error = %e, "failed to evaluate budgets");
                return Vec::new();
            }
        };

        for status in &triggered {
            tracing::info!(
                budget = %status.budget_id,
                level = %status.alert_level(),
                percent = status.percentage_used,
                "budget alert"
            );
            if let Some(notifier) = self.notifier {
                notifier.send_budget_alert(category_name, status);
            }
        }
        triggered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::config::settings::UserProfile;
    use crate::models::{Budget, Cadence, Category, DateWindow};
    use crate::notify::MemoryMailer;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_category(storage: &Storage, name: &str, kind: EntryKind) -> Category {
        let category = Category::new(name, kind);
        storage.categories.upsert(category.clone()).unwrap();
        category
    }

    fn notifier(mailer: &MemoryMailer) -> NotificationService {
        let profile = UserProfile {
            email: Some("me@example.com".into()),
            ..UserProfile::default()
        };
        NotificationService::new(profile, "noreply@example.com", Box::new(mailer.clone()))
    }

    fn add_budget(storage: &Storage, category: &Category, cents: i64) -> Budget {
        let budget = Budget::new(
            category.id,
            Money::from_cents(cents),
            "USD",
            Cadence::Monthly,
            date(2025, 1, 1),
        );
        storage.budgets.upsert(budget.clone()).unwrap();
        budget
    }

    fn expense(category: &Category, on: NaiveDate, cents: i64) -> CreateTransactionInput {
        CreateTransactionInput::new(category.id, on, Money::from_cents(cents), "USD")
    }

    #[test]
    fn test_create_takes_kind_from_category() {
        let (_temp_dir, storage) = create_test_storage();
        let salary = add_category(&storage, "Salary", EntryKind::Income);
        let service = TransactionService::new(&storage);

        let txn = service
            .create(CreateTransactionInput::new(
                salary.id,
                date(2025, 1, 1),
                Money::from_cents(100_000),
                "USD",
            ))
            .unwrap();
        assert_eq!(txn.kind, EntryKind::Income);
        assert_eq!(service.count().unwrap(), 1);
        assert_eq!(service.find(&txn.id.to_string()).unwrap().unwrap().id, txn.id);
    }

    #[test]
    fn test_create_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let service = TransactionService::new(&storage);

        assert!(service
            .create(expense(&food, date(2025, 1, 1), 0))
            .unwrap_err()
            .is_validation());

        let mut bad_currency = expense(&food, date(2025, 1, 1), 100);
        bad_currency.currency = "usd".into();
        assert!(service.create(bad_currency).unwrap_err().is_validation());

        let missing = CreateTransactionInput::new(CategoryId::new(), date(2025, 1, 1), Money::from_cents(1), "USD");
        assert!(service.create(missing).unwrap_err().is_not_found());
    }

    #[test]
    fn test_amount_above_cap_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        add_budget(&storage, &food, 10_000);
        let service = TransactionService::new(&storage);

        let huge = Money::parse("50000000000000000").unwrap();
        let input = CreateTransactionInput::new(food.id, date(2025, 1, 2), huge, "USD");
        assert!(service.create(input.clone()).unwrap_err().is_validation());
        assert!(service.create(input).unwrap_err().is_validation());
        assert_eq!(service.count().unwrap(), 0);

        service
            .create(CreateTransactionInput::new(food.id, date(2025, 1, 2), Money::MAX, "USD"))
            .unwrap();
        service
            .create(CreateTransactionInput::new(food.id, date(2025, 1, 3), Money::MAX, "USD"))
            .unwrap();
        let window = DateWindow::month_of(date(2025, 1, 1));
        let spent = BudgetService::new(&storage).spent_in_window(food.id, window).unwrap();
        assert_eq!(spent.cents(), Money::MAX.cents() * 2);
    }

    #[test]
    fn test_write_returns_triggered_budgets() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let budget = add_budget(&storage, &food, 10_000);
        let service = TransactionService::new(&storage);

        let (_, alerts) = service
            .create_with_alerts(expense(&food, date(2025, 1, 3), 5_000))
            .unwrap();
        assert!(alerts.is_empty());

        let (txn, alerts) = service
            .create_with_alerts(expense(&food, date(2025, 1, 4), 4_000))
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].budget_id, budget.id);

        let (_, alerts) = service
            .update_with_alerts(
                txn.id,
                TransactionChanges {
                    amount: Some(Money::from_cents(1_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_alert_sent_when_threshold_reached() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        add_budget(&storage, &food, 10_000);

        let mailer = MemoryMailer::new();
        let notifier = notifier(&mailer);
        let service = TransactionService::with_notifier(&storage, &notifier);

        service.create(expense(&food, date(2025, 1, 3), 7_000)).unwrap();
        assert!(mailer.sent().is_empty());

        service.create(expense(&food, date(2025, 1, 4), 1_000)).unwrap();
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Budget Alert: Food");

        // No deduplication: every write past the threshold alerts again
        service.create(expense(&food, date(2025, 1, 5), 5_000)).unwrap();
        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].subject, "Budget Exceeded: Food");
    }

    #[test]
    fn test_alert_uses_transaction_date_period() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        add_budget(&storage, &food, 10_000);

        let mailer = MemoryMailer::new();
        let notifier = notifier(&mailer);
        let service = TransactionService::with_notifier(&storage, &notifier);

        service.create(expense(&food, date(2025, 1, 20), 9_000)).unwrap();
        assert_eq!(mailer.sent().len(), 1);

        // February starts a fresh period
        service.create(expense(&food, date(2025, 2, 1), 1_000)).unwrap();
        assert_eq!(mailer.sent().len(), 1);
    }

    #[test]
    fn test_mailer_failure_does_not_fail_write() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        add_budget(&storage, &food, 100);

        let profile = UserProfile {
            email: Some("me@example.com".into()),
            ..UserProfile::default()
        };
        let notifier = NotificationService::new(profile, "x@example.com", Box::new(MemoryMailer::failing()));
        let service = TransactionService::with_notifier(&storage, &notifier);

        let txn = service.create(expense(&food, date(2025, 1, 1), 500)).unwrap();
        assert!(service.get(txn.id).unwrap().is_some());
    }

    #[test]
    fn test_update_moves_category_and_alerts() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let rent = add_category(&storage, "Rent", EntryKind::Expense);
        let salary = add_category(&storage, "Salary", EntryKind::Income);
        add_budget(&storage, &rent, 1_000);

        let mailer = MemoryMailer::new();
        let notifier = notifier(&mailer);
        let service = TransactionService::with_notifier(&storage, &notifier);

        let txn = service.create(expense(&food, date(2025, 1, 2), 900)).unwrap();
        assert!(mailer.sent().is_empty());

        let moved = service
            .update(
                txn.id,
                TransactionChanges {
                    category_id: Some(rent.id),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(moved.category_id, rent.id);
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].subject, "Budget Alert: Rent");

        let income = service
            .update(
                txn.id,
                TransactionChanges {
                    category_id: Some(salary.id),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(income.kind, EntryKind::Income);
        assert_eq!(mailer.sent().len(), 1);
    }

    #[test]
    fn test_delete_does_not_alert() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let service = TransactionService::new(&storage);
        let txn = service.create(expense(&food, date(2025, 1, 2), 900)).unwrap();

        let mailer = MemoryMailer::new();
        add_budget(&storage, &food, 100);
        let notifier = notifier(&mailer);
        let alerting = TransactionService::with_notifier(&storage, &notifier);

        alerting.delete(txn.id).unwrap();
        assert!(mailer.sent().is_empty());
        assert!(alerting.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let salary = add_category(&storage, "Salary", EntryKind::Income);
        let service = TransactionService::new(&storage);

        for day in 1..=5 {
            service.create(expense(&food, date(2025, 1, day), 100)).unwrap();
        }
        service
            .create(CreateTransactionInput::new(salary.id, date(2025, 1, 3), Money::from_cents(1), "USD"))
            .unwrap();

        let all = service.list(TransactionFilter::new()).unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].date, date(2025, 1, 5));

        let ranged = service
            .list(
                TransactionFilter::new()
                    .kind(EntryKind::Expense)
                    .date_range(date(2025, 1, 2), date(2025, 1, 4)),
            )
            .unwrap();
        assert_eq!(ranged.len(), 3);

        let limited = service
            .list(TransactionFilter::new().category(food.id).limit(2))
            .unwrap();
        assert_eq!(limited.len(), 2);
    }
}
