//! Budget display formatting

use std::collections::HashMap;

use tabled::{settings::Style, Table, Tabled};

use crate::models::{Budget, BudgetStatus, CategoryId};

use super::category::yes_no;
use super::report::{format_bar, format_percentage};

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Cadence")]
    cadence: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Alert at")]
    threshold: String,
    #[tabled(rename = "Active")]
    active: String,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Budget")]
    amount: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Usage")]
    bar: String,
    #[tabled(rename = "Status")]
    level: String,
}

fn category_name(names: &HashMap<CategoryId, String>, id: CategoryId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

pub fn format_budget_list(budgets: &[Budget], names: &HashMap<CategoryId, String>) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let rows = budgets.iter().map(|b| BudgetRow {
        id: b.id.to_string(),
        category: category_name(names, b.category_id),
        amount: b.amount.format_with_currency(&b.currency),
        cadence: b.cadence.to_string(),
        start: b.start_date.to_string(),
        end: b.end_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
        threshold: format!("{}%", b.alert_threshold),
        active: yes_no(b.is_active).to_string(),
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format evaluated budgets with a usage bar
pub fn format_budget_statuses(statuses: &[BudgetStatus], names: &HashMap<CategoryId, String>) -> String {
    if statuses.is_empty() {
        return "No active budgets.".to_string();
    }

    let rows = statuses.iter().map(|s| StatusRow {
        category: category_name(names, s.category_id),
        period: s.window.to_string(),
        amount: s.amount.format_with_currency(&s.currency),
        spent: s.spent.format_with_currency(&s.currency),
        remaining: s.remaining.format_with_currency(&s.currency),
        used: format_percentage(s.percentage_used),
        bar: format_bar(s.percentage_used.min(100.0), 100.0, 10),
        level: s.alert_level().to_string(),
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format one budget and its current status
pub fn format_budget_details(budget: &Budget, status: &BudgetStatus, category_name: &str) -> String {
    let currency = budget.currency.as_str();
    let mut output = String::new();

    output.push_str(&format!("Budget: {} ({})\n", category_name, budget.id));
    output.push_str(&format!(
        "  Amount:      {} {}\n",
        budget.amount.format_with_currency(currency),
        budget.cadence.as_str()
    ));
    output.push_str(&format!("  Start:       {}\n", budget.start_date));
    if let Some(end) = budget.end_date {
        output.push_str(&format!("  End:         {}\n", end));
    }
    output.push_str(&format!("  Alert at:    {}%\n", budget.alert_threshold));
    output.push_str(&format!("  Active:      {}\n", yes_no(budget.is_active)));

    output.push_str("\nCurrent period\n");
    output.push_str(&format!("  Period:      {}\n", status.window));
    output.push_str(&format!("  Spent:       {}\n", status.spent.format_with_currency(currency)));
    output.push_str(&format!(
        "  Remaining:   {}\n",
        status.remaining.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Used:        {} {}\n",
        format_percentage(status.percentage_used),
        format_bar(status.percentage_used.min(100.0), 100.0, 20)
    ));
    output.push_str(&format!("  Status:      {}\n", status.alert_level()));

    output
}
