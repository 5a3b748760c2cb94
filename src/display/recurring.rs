//! Recurring schedule display formatting

use std::collections::HashMap;

use tabled::{settings::Style, Table, Tabled};

use crate::models::{CategoryId, RecurringTransaction};

use super::category::yes_no;

#[derive(Tabled)]
struct RecurringRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Every")]
    frequency: String,
    #[tabled(rename = "Next")]
    next: String,
    #[tabled(rename = "Ends")]
    ends: String,
    #[tabled(rename = "Active")]
    active: String,
}

pub fn format_recurring_list(
    schedules: &[RecurringTransaction],
    names: &HashMap<CategoryId, String>,
) -> String {
    if schedules.is_empty() {
        return "No recurring transactions.".to_string();
    }

    let rows = schedules.iter().map(|r| RecurringRow {
        id: r.id.to_string(),
        description: r.description.clone(),
        category: names
            .get(&r.category_id)
            .cloned()
            .unwrap_or_else(|| r.category_id.to_string()),
        amount: r.amount.format_with_currency(&r.currency),
        frequency: r.frequency.to_string(),
        next: if r.is_active {
            r.next_occurrence.to_string()
        } else {
            "-".to_string()
        },
        ends: r.end_date.map(|d| d.to_string()).unwrap_or_else(|| "never".into()),
        active: yes_no(r.is_active).to_string(),
    });

    Table::new(rows).with(Style::psql()).to_string()
}
