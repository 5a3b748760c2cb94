//! Budget CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::budget::{format_budget_details, format_budget_list, format_budget_statuses};
use crate::error::TrackerResult;
use crate::models::{Cadence, Money};
use crate::services::{BudgetChanges, BudgetFilter, BudgetService, CategoryService, CreateBudgetInput};
use crate::storage::Storage;

use super::{category_names, currency_or_default, parse_date, parse_money, today};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// List budgets
    List {
        /// Filter by category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Include inactive budgets
        #[arg(short, long)]
        all: bool,
    },

    /// Create a budget on an expense category
    Create {
        /// Category name or ID
        category: String,
        /// Limit per period (e.g., "500.00")
        #[arg(value_parser = parse_money)]
        amount: Money,
        /// daily, weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: Cadence,
        /// First day of the first period, defaults to today
        #[arg(short, long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        /// Fixed last day; the budget then does not repeat
        #[arg(short, long, value_parser = parse_date)]
        end: Option<NaiveDate>,
        /// Percentage at which to alert (1-100)
        #[arg(short = 't', long)]
        threshold: Option<u8>,
        #[arg(long)]
        currency: Option<String>,
    },

    /// Show a budget and its current period
    Show {
        /// Budget ID
        id: String,
        /// Evaluate the period containing this date
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,
    },

    /// Edit a budget
    Edit {
        /// Budget ID
        id: String,
        #[arg(short, long, value_parser = parse_money)]
        amount: Option<Money>,
        #[arg(short, long)]
        period: Option<Cadence>,
        #[arg(short, long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        #[arg(short, long, value_parser = parse_date, conflicts_with = "no_end")]
        end: Option<NaiveDate>,
        /// Remove the end date so the budget repeats
        #[arg(long)]
        no_end: bool,
        #[arg(short = 't', long)]
        threshold: Option<u8>,
        #[arg(long, conflicts_with = "activate")]
        deactivate: bool,
        #[arg(long)]
        activate: bool,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },

    /// Spending against every active budget
    Status {
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,
    },

    /// Active budgets at or above their alert threshold
    Alerts {
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, settings: &Settings, cmd: BudgetCommands) -> TrackerResult<()> {
    let service = BudgetService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        BudgetCommands::List { category, all } => {
            let mut filter = BudgetFilter::new();
            if let Some(category) = category {
                filter = filter.category(categories.require(&category)?.id);
            }
            if !all {
                filter = filter.active_only();
            }
            let budgets = service.list(filter)?;
            println!("{}", format_budget_list(&budgets, &category_names(storage)?));
        }

        BudgetCommands::Create {
            category,
            amount,
            period,
            start,
            end,
            threshold,
            currency,
        } => {
            let category = categories.require(&category)?;
            let budget = service.create(CreateBudgetInput {
                category_id: category.id,
                amount,
                currency: currency_or_default(currency, settings),
                cadence: period,
                start_date: start.unwrap_or_else(today),
                end_date: end,
                alert_threshold: threshold,
            })?;

            println!(
                "Created {} budget of {} for {}",
                budget.cadence.as_str(),
                budget.amount.format_with_currency(&budget.currency),
                category.name
            );
            println!("  Current period: {}", budget.window_for(today()));
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::Show { id, as_of } => {
            let budget = service.require(&id)?;
            let status = service.evaluate_budget(&budget, as_of.unwrap_or_else(today))?;
            let name = categories
                .get(budget.category_id)?
                .map(|c| c.name)
                .unwrap_or_default();
            print!("{}", format_budget_details(&budget, &status, &name));
        }

        BudgetCommands::Edit {
            id,
            amount,
            period,
            start,
            end,
            no_end,
            threshold,
            deactivate,
            activate,
        } => {
            let budget = service.require(&id)?;
            let end_date = if no_end { Some(None) } else { end.map(Some) };

            let mut updated = service.update(
                budget.id,
                BudgetChanges {
                    amount,
                    cadence: period,
                    start_date: start,
                    end_date,
                    alert_threshold: threshold,
                },
            )?;
            if deactivate || activate {
                updated = service.set_active(budget.id, activate)?;
            }
            println!("Updated budget {}", updated.id);
        }

        BudgetCommands::Delete { id } => {
            let budget = service.require(&id)?;
            service.delete(budget.id)?;
            println!("Deleted budget {}", budget.id);
        }

        BudgetCommands::Status { as_of } => {
            let statuses = service.evaluate_active(as_of.unwrap_or_else(today))?;
            println!("{}", format_budget_statuses(&statuses, &category_names(storage)?));
        }

        BudgetCommands::Alerts { as_of } => {
            let alerts = service.alerts(as_of.unwrap_or_else(today))?;
            if alerts.is_empty() {
                println!("No budgets at or above their alert threshold.");
            } else {
                println!("{}", format_budget_statuses(&alerts, &category_names(storage)?));
            }
        }
    }

    Ok(())
}
