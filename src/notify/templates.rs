//! Plain-text and HTML bodies for outgoing email

use crate::config::settings::UserProfile;
use crate::models::BudgetStatus;
use crate::reports::{CategoryTotal, FinancialReport, PeriodSummary};

/// Subject, text body and HTML body
pub struct Rendered {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub fn budget_alert(profile: &UserProfile, category_name: &str, status: &BudgetStatus) -> Rendered {
    let currency = status.currency.as_str();
    let (subject, headline) = if status.is_over_budget {
        (
            format!("Budget Exceeded: {}", category_name),
            format!("You have exceeded your {} budget.", category_name),
        )
    } else {
        (
            format!("Budget Alert: {}", category_name),
            format!(
                "You have used {:.1}% of your {} budget (alert threshold {}%).",
                status.percentage_used, category_name, status.alert_threshold
            ),
        )
    };

    let rows = [
        ("Budget", status.amount.format_with_currency(currency)),
        ("Spent", status.spent.format_with_currency(currency)),
        ("Remaining", status.remaining.format_with_currency(currency)),
        ("Used", format!("{:.1}%", status.percentage_used)),
        ("Period", status.window.to_string()),
    ];

    let mut text = format!("Hi {},\n\n{}\n\n", profile.display_name(), headline);
    for (label, value) in &rows {
        text.push_str(&format!("{:<10} {}\n", format!("{}:", label), value));
    }

    let html = format!(
        "<p>Hi {},</p><p>{}</p>{}",
        escape(profile.display_name()),
        escape(&headline),
        html_table(&rows)
    );

    Rendered { subject, text, html }
}

pub fn summary(profile: &UserProfile, summary: &PeriodSummary) -> Rendered {
    let currency = profile.preferred_currency.as_str();
    let subject = format!("Financial Summary: {}", summary.window);
    let rows = summary_rows(summary, currency);

    let mut text = format!(
        "Hi {},\n\nHere is your summary for {}.\n\n",
        profile.display_name(),
        summary.window
    );
    for (label, value) in &rows {
        text.push_str(&format!("{:<16} {}\n", format!("{}:", label), value));
    }

    let html = format!(
        "<p>Hi {},</p><p>Here is your summary for {}.</p>{}",
        escape(profile.display_name()),
        summary.window,
        html_table(&rows)
    );

    Rendered { subject, text, html }
}

pub fn report(profile: &UserProfile, report: &FinancialReport) -> Rendered {
    let currency = profile.preferred_currency.as_str();
    let title = report.title();
    let subject = format!("{}: {}", title, report.window);
    let summary = &report.summary;

    let mut text = format!("Hi {},\n\n{} for {}\n\n", profile.display_name(), title, report.window);
    let mut html = format!(
        "<p>Hi {},</p><h2>{} for {}</h2>",
        escape(profile.display_name()),
        escape(&title),
        report.window
    );

    let rows = summary_rows(summary, currency);
    for (label, value) in &rows {
        text.push_str(&format!("{:<16} {}\n", format!("{}:", label), value));
    }
    html.push_str(&html_table(&rows));

    for (heading, totals) in [
        ("Top expense categories", &summary.expense_by_category),
        ("Top income categories", &summary.income_by_category),
    ] {
        if totals.is_empty() {
            continue;
        }
        let rows = category_rows(totals, currency);
        text.push_str(&format!("\n{}\n", heading));
        for (label, value) in &rows {
            text.push_str(&format!("  {:<20} {}\n", label, value));
        }
        html.push_str(&format!("<h3>{}</h3>{}", heading, html_table(&rows)));
    }

    if !report.budget_alerts.is_empty() {
        text.push_str("\nBudget alerts\n");
        html.push_str("<h3>Budget alerts</h3><ul>");
        for alert in &report.budget_alerts {
            let status = &alert.status;
            let line = format!(
                "{}: {} of {} ({:.1}%, {})",
                alert.category_name,
                status.spent.format_with_currency(&status.currency),
                status.amount.format_with_currency(&status.currency),
                status.percentage_used,
                status.alert_level()
            );
            text.push_str(&format!("  {}\n", line));
            html.push_str(&format!("<li>{}</li>", escape(&line)));
        }
        html.push_str("</ul>");
    }

    Rendered { subject, text, html }
}

fn summary_rows(summary: &PeriodSummary, currency: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Total income", summary.total_income.format_with_currency(currency)),
        ("Total expenses", summary.total_expenses.format_with_currency(currency)),
        ("Net savings", summary.net_savings.format_with_currency(currency)),
        ("Transactions", summary.transaction_count.to_string()),
    ]
}

fn category_rows(totals: &[CategoryTotal], currency: &str) -> Vec<(String, String)> {
    totals
        .iter()
        .map(|t| {
            (
                t.category_name.clone(),
                format!("{} ({})", t.total.format_with_currency(currency), t.count),
            )
        })
        .collect()
}

fn html_table<L: AsRef<str>>(rows: &[(L, String)]) -> String {
    let mut html = String::from("<table>");
    for (label, value) in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(label.as_ref()),
            escape(value)
        ));
    }
    html.push_str("</table>");
    html
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
