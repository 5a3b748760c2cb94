//! Transaction display formatting

use std::collections::HashMap;

use tabled::{settings::Style, Table, Tabled};

use crate::models::{CategoryId, Transaction};

use super::report::truncate;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Format transactions as a register, with category names looked up in `names`
pub fn format_transaction_register(
    transactions: &[Transaction],
    names: &HashMap<CategoryId, String>,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows = transactions.iter().map(|t| TransactionRow {
        id: t.id.to_string(),
        date: t.date.to_string(),
        category: names
            .get(&t.category_id)
            .cloned()
            .unwrap_or_else(|| t.category_id.to_string()),
        amount: t.signed_amount().format_with_currency(&t.currency),
        description: truncate(&t.description, 40),
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format transaction details
pub fn format_transaction_details(txn: &Transaction, category_name: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("  Date:        {}\n", txn.date));
    output.push_str(&format!(
        "  Amount:      {}\n",
        txn.signed_amount().format_with_currency(&txn.currency)
    ));
    output.push_str(&format!("  Category:    {} ({})\n", category_name, txn.kind));
    if !txn.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", txn.description));
    }
    if !txn.notes.is_empty() {
        output.push_str(&format!("  Notes:       {}\n", txn.notes));
    }
    if let Some(recurring_id) = txn.recurring_id {
        output.push_str(&format!("  Recurring:   {}\n", recurring_id));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        txn.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryKind, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_register_uses_category_names() {
        let category_id = CategoryId::new();
        let mut txn = Transaction::new(
            category_id,
            EntryKind::Expense,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Money::from_cents(1_250),
            "USD",
        );
        txn.description = "Lunch".into();

        let names = HashMap::from([(category_id, "Dining".to_string())]);
        let output = format_transaction_register(&[txn.clone()], &names);
        assert!(output.contains("Dining"));
        assert!(output.contains("USD -12.50"));
        assert!(output.contains("Lunch"));

        let details = format_transaction_details(&txn, "Dining");
        assert!(details.contains("Category:    Dining (Expense)"));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(
            format_transaction_register(&[], &HashMap::new()),
            "No transactions found."
        );
    }
}
