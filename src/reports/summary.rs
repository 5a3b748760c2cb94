//! Income and expense totals for a date window

use std::collections::HashMap;

use crate::error::TrackerResult;
use crate::models::{CategoryId, DateWindow, EntryKind, Money};
use crate::storage::Storage;

/// Total for one category inside a summary
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub category_name: String,
    pub total: Money,
    pub count: usize,
}

/// Income, expenses and their per-category breakdown over a window
#[derive(Debug, Clone)]
pub struct PeriodSummary {
    pub window: DateWindow,
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_savings: Money,
    pub transaction_count: usize,
    /// Largest first, at most `top_n` entries
    pub expense_by_category: Vec<CategoryTotal>,
    /// Largest first, at most `top_n` entries
    pub income_by_category: Vec<CategoryTotal>,
}

impl PeriodSummary {
    /// Summarize every transaction dated inside `window`
    pub fn generate(storage: &Storage, window: DateWindow, top_n: usize) -> TrackerResult<Self> {
        let transactions = storage.transactions.get_in_window(window)?;

        let mut total_income = Money::zero();
        let mut total_expenses = Money::zero();
        let mut income: HashMap<CategoryId, (Money, usize)> = HashMap::new();
        let mut expenses: HashMap<CategoryId, (Money, usize)> = HashMap::new();

        for txn in &transactions {
            let bucket = match txn.kind {
                EntryKind::Income => {
                    total_income += txn.amount;
                    &mut income
                }
                EntryKind::Expense => {
                    total_expenses += txn.amount;
                    &mut expenses
                }
            };
            let entry = bucket.entry(txn.category_id).or_insert((Money::zero(), 0));
            entry.0 += txn.amount;
            entry.1 += 1;
        }

        let names: HashMap<CategoryId, String> = storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(Self {
            window,
            total_income,
            total_expenses,
            net_savings: total_income - total_expenses,
            transaction_count: transactions.len(),
            expense_by_category: rank(expenses, &names, top_n),
            income_by_category: rank(income, &names, top_n),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

fn rank(
    totals: HashMap<CategoryId, (Money, usize)>,
    names: &HashMap<CategoryId, String>,
    top_n: usize,
) -> Vec<CategoryTotal> {
    let mut ranked: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category_id, (total, count))| CategoryTotal {
            category_id,
            category_name: names
                .get(&category_id)
                .cloned()
                .unwrap_or_else(|| category_id.to_string()),
            total,
            count,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::{Category, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generate_summary() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(TrackerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        let salary = Category::new("Salary", EntryKind::Income);
        let food = Category::new("Food", EntryKind::Expense);
        let rent = Category::new("Rent", EntryKind::Expense);
        for c in [&salary, &food, &rent] {
            storage.categories.upsert(c.clone()).unwrap();
        }

        let add = |c: &Category, day: u32, cents: i64| {
            storage
                .transactions
                .upsert(Transaction::new(c.id, c.kind, date(2025, 1, day), Money::from_cents(cents), "USD"))
                .unwrap();
        };
        add(&salary, 1, 300_000);
        add(&rent, 2, 120_000);
        add(&food, 3, 5_000);
        add(&food, 4, 2_500);
        storage
            .transactions
            .upsert(Transaction::new(food.id, EntryKind::Expense, date(2025, 2, 1), Money::from_cents(999), "USD"))
            .unwrap();

        let summary =
            PeriodSummary::generate(&storage, DateWindow::month_of(date(2025, 1, 1)), 5).unwrap();
        assert_eq!(summary.transaction_count, 4);
        assert_eq!(summary.total_income, Money::from_cents(300_000));
        assert_eq!(summary.total_expenses, Money::from_cents(127_500));
        assert_eq!(summary.net_savings, Money::from_cents(172_500));
        assert_eq!(summary.expense_by_category[0].category_name, "Rent");
        assert_eq!(summary.expense_by_category[1].count, 2);
        assert_eq!(summary.income_by_category.len(), 1);

        let top_one = PeriodSummary::generate(&storage, DateWindow::month_of(date(2025, 1, 1)), 1).unwrap();
        assert_eq!(top_one.expense_by_category.len(), 1);
    }

    #[test]
    fn test_empty_window() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(TrackerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let summary =
            PeriodSummary::generate(&storage, DateWindow::single_day(date(2025, 1, 1)), 5).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.net_savings, Money::zero());
    }
}
