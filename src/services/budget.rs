//! Budget service
//!
//! CRUD for budgets plus evaluation: how much of each budget's current
//! period has been spent, and which budgets a new expense pushes over their
//! alert threshold.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    Budget, BudgetId, BudgetStatus, Cadence, CategoryId, DateWindow, EntryKind, Money,
    Transaction, DEFAULT_ALERT_THRESHOLD,
};
use crate::storage::Storage;

/// Service for budget management and evaluation
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub category_id: CategoryId,
    pub amount: Money,
    pub currency: String,
    pub cadence: Cadence,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub alert_threshold: Option<u8>,
}

/// Fields to change on an existing budget; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct BudgetChanges {
    pub amount: Option<Money>,
    pub cadence: Option<Cadence>,
    pub start_date: Option<NaiveDate>,
    /// `Some(None)` clears the end date
    pub end_date: Option<Option<NaiveDate>>,
    pub alert_threshold: Option<u8>,
}

/// Options for filtering budgets
#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    pub category_id: Option<CategoryId>,
    pub cadence: Option<Cadence>,
    pub active_only: bool,
}

impl BudgetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new budget on an expense category
    pub fn create(&self, input: CreateBudgetInput) -> TrackerResult<Budget> {
        let category = self
            .storage
            .categories
            .get(input.category_id)?
            .ok_or_else(|| TrackerError::category_not_found(input.category_id.to_string()))?;

        if !category.is_expense() {
            return Err(TrackerError::Validation(format!(
                "Budgets can only be set on expense categories; '{}' is an income category",
                category.name
            )));
        }

        if self
            .storage
            .budgets
            .find_conflict(input.category_id, input.cadence, input.start_date, None)?
            .is_some()
        {
            return Err(TrackerError::Duplicate {
                entity_type: "Budget",
                identifier: format!(
                    "{} {} from {}",
                    category.name, input.cadence, input.start_date
                ),
            });
        }

        let mut budget = Budget::new(
            input.category_id,
            input.amount,
            input.currency,
            input.cadence,
            input.start_date,
        );
        budget.end_date = input.end_date;
        budget.alert_threshold = input.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);

        budget
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(category.name.clone()),
            &budget,
        )?;

        tracing::info!(
            category = %category.name,
            amount = %budget.amount,
            cadence = %budget.cadence,
            "created budget"
        );
        Ok(budget)
    }

    /// Get a budget by ID
    pub fn get(&self, id: BudgetId) -> TrackerResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Find a budget by full or short ID string
    pub fn find(&self, identifier: &str) -> TrackerResult<Option<Budget>> {
        if let Ok(id) = identifier.parse::<BudgetId>() {
            if let Some(budget) = self.storage.budgets.get(id)? {
                return Ok(Some(budget));
            }
        }
        self.storage.budgets.find(|b| b.id.matches(identifier))
    }

    /// Find a budget or fail with a not-found error
    pub fn require(&self, identifier: &str) -> TrackerResult<Budget> {
        self.find(identifier)?
            .ok_or_else(|| TrackerError::budget_not_found(identifier))
    }

    /// List budgets, oldest first
    pub fn list(&self, filter: BudgetFilter) -> TrackerResult<Vec<Budget>> {
        self.storage.budgets.filter(|b| {
            filter.category_id.map_or(true, |c| b.category_id == c)
                && filter.cadence.map_or(true, |c| b.cadence == c)
                && (!filter.active_only || b.is_active)
        })
    }

    /// Update a budget
    pub fn update(&self, id: BudgetId, changes: BudgetChanges) -> TrackerResult<Budget> {
        let mut budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| TrackerError::budget_not_found(id.to_string()))?;

        let before = budget.clone();

        if let Some(amount) = changes.amount {
            budget.amount = amount;
        }
        if let Some(cadence) = changes.cadence {
            budget.cadence = cadence;
        }
        if let Some(start_date) = changes.start_date {
            budget.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            budget.end_date = end_date;
        }
        if let Some(threshold) = changes.alert_threshold {
            budget.alert_threshold = threshold;
        }

        if self
            .storage
            .budgets
            .find_conflict(budget.category_id, budget.cadence, budget.start_date, Some(id))?
            .is_some()
        {
            return Err(TrackerError::Duplicate {
                entity_type: "Budget",
                identifier: format!("{} from {}", budget.cadence, budget.start_date),
            });
        }

        budget.updated_at = Utc::now();
        budget
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            self.category_name(budget.category_id)?,
            &before,
            &budget,
        )?;

        Ok(budget)
    }

    /// Activate or deactivate a budget
    pub fn set_active(&self, id: BudgetId, active: bool) -> TrackerResult<Budget> {
        let mut budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| TrackerError::budget_not_found(id.to_string()))?;

        if budget.is_active == active {
            return Ok(budget);
        }

        let before = budget.clone();
        budget.is_active = active;
        budget.updated_at = Utc::now();

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            self.category_name(budget.category_id)?,
            &before,
            &budget,
        )?;

        Ok(budget)
    }

    /// Delete a budget
    pub fn delete(&self, id: BudgetId) -> TrackerResult<Budget> {
        let budget = self
            .storage
            .budgets
            .delete(id)?
            .ok_or_else(|| TrackerError::budget_not_found(id.to_string()))?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            self.category_name(budget.category_id)?,
            &budget,
        )?;

        Ok(budget)
    }

    /// Total expense spending in a category over `window`
    pub fn spent_in_window(&self, category_id: CategoryId, window: DateWindow) -> TrackerResult<Money> {
        self.storage
            .transactions
            .total_for_category(category_id, EntryKind::Expense, window)
    }

    /// Evaluate one budget for the period containing `as_of`
    pub fn evaluate(&self, id: BudgetId, as_of: NaiveDate) -> TrackerResult<BudgetStatus> {
        let budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| TrackerError::budget_not_found(id.to_string()))?;
        self.evaluate_budget(&budget, as_of)
    }

    /// Evaluate an already-loaded budget
    pub fn evaluate_budget(&self, budget: &Budget, as_of: NaiveDate) -> TrackerResult<BudgetStatus> {
        let window = budget.window_for(as_of);
        let spent = self.spent_in_window(budget.category_id, window)?;
        Ok(BudgetStatus::evaluate(budget, window, spent))
    }

    /// Evaluate every active budget as of one date
    pub fn evaluate_active(&self, as_of: NaiveDate) -> TrackerResult<Vec<BudgetStatus>> {
        self.storage
            .budgets
            .filter(|b| b.is_active)?
            .iter()
            .map(|b| self.evaluate_budget(b, as_of))
            .collect()
    }

    /// Active budgets at or above their alert threshold
    pub fn alerts(&self, as_of: NaiveDate) -> TrackerResult<Vec<BudgetStatus>> {
        Ok(self
            .evaluate_active(as_of)?
            .into_iter()
            .filter(|s| s.should_alert)
            .collect())
    }

    /// Budgets a transaction leaves in need of a notification
    ///
    /// Each active budget on the transaction's category is evaluated for the
    /// period containing the transaction date. Income never triggers alerts.
    pub fn triggered_by(&self, txn: &Transaction) -> TrackerResult<Vec<BudgetStatus>> {
        if txn.kind != EntryKind::Expense {
            return Ok(Vec::new());
        }

        let mut triggered = Vec::new();
        for budget in self.storage.budgets.get_active_for_category(txn.category_id)? {
            let status = self.evaluate_budget(&budget, txn.date)?;
            tracing::debug!(
                budget = %budget.id,
                window = %status.window,
                spent = %status.spent,
                percent = status.percentage_used,
                "evaluated budget"
            );
            if status.needs_notification() {
                triggered.push(status);
            }
        }
        Ok(triggered)
    }

    fn category_name(&self, id: CategoryId) -> TrackerResult<Option<String>> {
        Ok(self.storage.categories.get(id)?.map(|c| c.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::{AlertLevel, Category};
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

    fn add_expense(storage: &Storage, category: &Category, on: NaiveDate, cents: i64) -> Transaction {
        let txn = Transaction::new(category.id, category.kind, on, Money::from_cents(cents), "USD");
        storage.transactions.upsert(txn.clone()).unwrap();
        txn
    }

    fn monthly_input(category_id: CategoryId, cents: i64, start: NaiveDate) -> CreateBudgetInput {
        CreateBudgetInput {
            category_id,
            amount: Money::from_cents(cents),
            currency: "USD".into(),
            cadence: Cadence::Monthly,
            start_date: start,
            end_date: None,
            alert_threshold: None,
        }
    }

    #[test]
    fn test_create_budget_defaults() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let service = BudgetService::new(&storage);

        let budget = service
            .create(monthly_input(food.id, 50_000, date(2025, 1, 1)))
            .unwrap();
        assert_eq!(budget.alert_threshold, DEFAULT_ALERT_THRESHOLD);
        assert!(budget.is_active);
        assert_eq!(service.find(&budget.id.to_string()).unwrap().unwrap().id, budget.id);
    }

    #[test]
    fn test_create_rejects_income_category_and_duplicates() {
        let (_temp_dir, storage) = create_test_storage();
        let salary = add_category(&storage, "Salary", EntryKind::Income);
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let service = BudgetService::new(&storage);

        assert!(service
            .create(monthly_input(salary.id, 100, date(2025, 1, 1)))
            .unwrap_err()
            .is_validation());

        service
            .create(monthly_input(food.id, 100, date(2025, 1, 1)))
            .unwrap();
        let err = service
            .create(monthly_input(food.id, 200, date(2025, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, TrackerError::Duplicate { .. }));
    }

    #[test]
    fn test_threshold_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let service = BudgetService::new(&storage);

        let mut input = monthly_input(food.id, 100, date(2025, 1, 1));
        input.alert_threshold = Some(0);
        assert!(service.create(input.clone()).unwrap_err().is_validation());
        input.alert_threshold = Some(101);
        assert!(service.create(input).unwrap_err().is_validation());
    }

    #[test]
    fn test_spent_counts_only_expenses_in_window() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let service = BudgetService::new(&storage);

        add_expense(&storage, &food, date(2025, 1, 1), 1_000);
        add_expense(&storage, &food, date(2025, 1, 31), 2_000);
        add_expense(&storage, &food, date(2025, 2, 1), 4_000);

        let january = DateWindow::month_of(date(2025, 1, 15));
        assert_eq!(
            service.spent_in_window(food.id, january).unwrap(),
            Money::from_cents(3_000)
        );
    }

    #[test]
    fn test_evaluate_threshold_exact() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let service = BudgetService::new(&storage);
        let budget = service
            .create(monthly_input(food.id, 5_000, date(2025, 1, 1)))
            .unwrap();

        add_expense(&storage, &food, date(2025, 1, 10), 3_999);
        let status = service.evaluate(budget.id, date(2025, 1, 10)).unwrap();
        assert!(!status.should_alert);
        assert_eq!(status.alert_level(), AlertLevel::Ok);

        add_expense(&storage, &food, date(2025, 1, 11), 1);
        let status = service.evaluate(budget.id, date(2025, 1, 11)).unwrap();
        assert!(status.should_alert);
        assert!(!status.is_over_budget);
        assert_eq!(status.percentage_used, 80.0);
        assert_eq!(status.remaining, Money::from_cents(1_000));
        assert_eq!(status.window, DateWindow::month_of(date(2025, 1, 1)));
    }

    #[test]
    fn test_evaluate_uses_period_of_as_of_date() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let service = BudgetService::new(&storage);
        let budget = service
            .create(monthly_input(food.id, 10_000, date(2025, 1, 15)))
            .unwrap();

        add_expense(&storage, &food, date(2025, 2, 14), 9_000);
        add_expense(&storage, &food, date(2025, 2, 15), 500);

        let first = service.evaluate(budget.id, date(2025, 2, 14)).unwrap();
        assert_eq!(first.window.end, date(2025, 2, 14));
        assert_eq!(first.spent, Money::from_cents(9_000));

        let second = service.evaluate(budget.id, date(2025, 2, 20)).unwrap();
        assert_eq!(second.window.start, date(2025, 2, 15));
        assert_eq!(second.spent, Money::from_cents(500));
    }

    #[test]
    fn test_alerts_and_triggered_by() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let rent = add_category(&storage, "Rent", EntryKind::Expense);
        let service = BudgetService::new(&storage);

        service
            .create(monthly_input(food.id, 10_000, date(2025, 1, 1)))
            .unwrap();
        let rent_budget = service
            .create(monthly_input(rent.id, 10_000, date(2025, 1, 1)))
            .unwrap();

        let txn = add_expense(&storage, &food, date(2025, 1, 5), 12_000);
        add_expense(&storage, &rent, date(2025, 1, 5), 1_000);

        let triggered = service.triggered_by(&txn).unwrap();
        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].alert_level(), AlertLevel::Exceeded);

        let alerts = service.alerts(date(2025, 1, 5)).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category_id, food.id);

        service.set_active(rent_budget.id, false).unwrap();
        assert_eq!(service.evaluate_active(date(2025, 1, 5)).unwrap().len(), 1);
    }

    #[test]
    fn test_income_never_triggers() {
        let (_temp_dir, storage) = create_test_storage();
        let salary = add_category(&storage, "Salary", EntryKind::Income);
        let service = BudgetService::new(&storage);
        let txn = Transaction::new(
            salary.id,
            EntryKind::Income,
            date(2025, 1, 1),
            Money::from_cents(100),
            "USD",
        );
        assert!(service.triggered_by(&txn).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let service = BudgetService::new(&storage);
        let budget = service
            .create(monthly_input(food.id, 10_000, date(2025, 1, 1)))
            .unwrap();

        let updated = service
            .update(
                budget.id,
                BudgetChanges {
                    amount: Some(Money::from_cents(20_000)),
                    cadence: Some(Cadence::Weekly),
                    alert_threshold: Some(90),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.cadence, Cadence::Weekly);
        assert_eq!(updated.alert_threshold, 90);

        let bad = service.update(
            budget.id,
            BudgetChanges {
                end_date: Some(Some(date(2024, 12, 1))),
                ..Default::default()
            },
        );
        assert!(bad.unwrap_err().is_validation());

        service.delete(budget.id).unwrap();
        assert!(service.get(budget.id).unwrap().is_none());
        assert!(service.delete(budget.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_filter() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_category(&storage, "Food", EntryKind::Expense);
        let rent = add_category(&storage, "Rent", EntryKind::Expense);
        let service = BudgetService::new(&storage);

        service
            .create(monthly_input(food.id, 100, date(2025, 1, 1)))
            .unwrap();
        let mut weekly = monthly_input(rent.id, 100, date(2025, 1, 1));
        weekly.cadence = Cadence::Weekly;
        service.create(weekly).unwrap();

        assert_eq!(service.list(BudgetFilter::new()).unwrap().len(), 2);
        assert_eq!(
            service
                .list(BudgetFilter::new().cadence(Cadence::Weekly))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            service
                .list(BudgetFilter::new().category(food.id).active_only())
                .unwrap()
                .len(),
            1
        );
    }
}
