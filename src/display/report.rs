//! Report formatting for terminal output

use std::collections::HashMap;

use tabled::{settings::Style, Table, Tabled};

use crate::models::{CategoryId, Money};
use crate::reports::{CategoryTotal, Dashboard, FinancialReport, MonthlyTrend, PeriodSummary};

use super::transaction::format_transaction_register;

const REPORT_WIDTH: usize = 60;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn separator() -> String {
    "─".repeat(REPORT_WIDTH)
}

fn double_separator() -> String {
    "═".repeat(REPORT_WIDTH)
}

#[derive(Tabled)]
struct CategoryTotalRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

fn format_category_totals(totals: &[CategoryTotal], overall: Money, currency: &str) -> String {
    let rows = totals.iter().map(|t| CategoryTotalRow {
        category: t.category_name.clone(),
        total: t.total.format_with_currency(currency),
        count: t.count,
        share: format_percentage(t.total.percent_of(overall)),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

/// Format the totals block and category breakdowns of a summary
pub fn format_summary(summary: &PeriodSummary, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Period: {}\n", summary.window));
    output.push_str(&format!("{}\n", separator()));
    output.push_str(&format!(
        "  Total income:    {}\n",
        summary.total_income.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Total expenses:  {}\n",
        summary.total_expenses.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Net savings:     {}\n",
        summary.net_savings.format_with_currency(currency)
    ));
    output.push_str(&format!("  Transactions:    {}\n", summary.transaction_count));

    if !summary.expense_by_category.is_empty() {
        output.push_str("\nExpenses by category\n");
        output.push_str(&format_category_totals(
            &summary.expense_by_category,
            summary.total_expenses,
            currency,
        ));
        output.push('\n');
    }

    if !summary.income_by_category.is_empty() {
        output.push_str("\nIncome by category\n");
        output.push_str(&format_category_totals(
            &summary.income_by_category,
            summary.total_income,
            currency,
        ));
        output.push('\n');
    }

    output
}

pub fn format_financial_report(report: &FinancialReport, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", double_separator()));
    output.push_str(&format!("{}\n", report.title()));
    output.push_str(&format!("{}\n", double_separator()));
    output.push_str(&format_summary(&report.summary, currency));

    if report.budget_alerts.is_empty() {
        output.push_str("\nNo budgets need attention.\n");
    } else {
        output.push_str("\nBudget alerts\n");
        for alert in &report.budget_alerts {
            let status = &alert.status;
            output.push_str(&format!(
                "  [{}] {}: {} of {} ({})\n",
                status.alert_level(),
                alert.category_name,
                status.spent.format_with_currency(&status.currency),
                status.amount.format_with_currency(&status.currency),
                format_percentage(status.percentage_used)
            ));
        }
    }

    output
}

pub fn format_dashboard(dashboard: &Dashboard, names: &HashMap<CategoryId, String>, currency: &str) -> String {
    let mut output = String::new();

    output.push_str("Dashboard\n");
    output.push_str(&format!("{}\n", double_separator()));
    output.push_str(&format!(
        "Active categories: {}   Active budgets: {}\n\n",
        dashboard.active_categories, dashboard.active_budgets
    ));
    output.push_str(&format_summary(&dashboard.summary, currency));
    output.push_str("\nRecent transactions\n");
    output.push_str(&format_transaction_register(&dashboard.recent_transactions, names));
    output.push('\n');

    output
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Savings")]
    savings: String,
}

pub fn format_trend(trend: &MonthlyTrend, currency: &str) -> String {
    if trend.months.is_empty() {
        return "No months to show.".to_string();
    }

    let rows = trend.months.iter().map(|m| TrendRow {
        month: m.label(),
        income: m.income.format_with_currency(currency),
        expenses: m.expenses.format_with_currency(currency),
        savings: m.savings.format_with_currency(currency),
    });

    format!(
        "{}\n\nTotal savings: {}\n",
        Table::new(rows).with(Style::psql()),
        trend.total_savings().format_with_currency(currency)
    )
}
