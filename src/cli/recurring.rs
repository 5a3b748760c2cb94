//! Recurring transaction CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::recurring::format_recurring_list;
use crate::display::transaction::format_transaction_register;
use crate::error::TrackerResult;
use crate::models::{Cadence, Money};
use crate::notify::NotificationService;
use crate::services::{CategoryService, CreateRecurringInput, RecurringService, TransactionService};
use crate::storage::Storage;

use super::{category_names, currency_or_default, parse_date, parse_money, today};

/// Recurring subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// List schedules
    List {
        /// Include paused and finished schedules
        #[arg(short, long)]
        all: bool,
    },

    /// Create a schedule
    Create {
        /// Category name or ID
        category: String,
        #[arg(value_parser = parse_money)]
        amount: Money,
        /// daily, weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        every: Cadence,
        /// First occurrence, defaults to today
        #[arg(short, long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        /// Last day an occurrence may fall on
        #[arg(short, long, value_parser = parse_date)]
        end: Option<NaiveDate>,
        #[arg(short = 'm', long)]
        description: Option<String>,
        #[arg(long)]
        currency: Option<String>,
    },

    /// Delete a schedule; generated transactions are kept
    Delete { id: String },

    /// Stop generating transactions
    Pause { id: String },

    /// Resume a paused schedule
    Resume { id: String },

    /// Generate all occurrences due up to a date
    Run {
        /// Defaults to today
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,
    },
}

pub fn handle_recurring_command(
    storage: &Storage,
    settings: &Settings,
    notifier: &NotificationService,
    cmd: RecurringCommands,
) -> TrackerResult<()> {
    let service = RecurringService::new(storage);

    match cmd {
        RecurringCommands::List { all } => {
            let schedules = service.list(all)?;
            println!("{}", format_recurring_list(&schedules, &category_names(storage)?));
        }

        RecurringCommands::Create {
            category,
            amount,
            every,
            start,
            end,
            description,
            currency,
        } => {
            let category = CategoryService::new(storage).require(&category)?;
            let schedule = service.create(CreateRecurringInput {
                category_id: category.id,
                amount,
                currency: currency_or_default(currency, settings),
                frequency: every,
                start_date: start.unwrap_or_else(today),
                end_date: end,
                description,
            })?;

            println!("Created recurring {}", schedule);
            println!("  Next: {}", schedule.next_occurrence);
            println!("  ID:   {}", schedule.id);
        }

        RecurringCommands::Delete { id } => {
            let schedule = service.require(&id)?;
            service.delete(schedule.id)?;
            println!("Deleted recurring {}", schedule.id);
        }

        RecurringCommands::Pause { id } => {
            let schedule = service.set_active(service.require(&id)?.id, false)?;
            println!("Paused recurring {}", schedule.id);
        }

        RecurringCommands::Resume { id } => {
            let schedule = service.set_active(service.require(&id)?.id, true)?;
            println!("Resumed recurring {} (next {})", schedule.id, schedule.next_occurrence);
        }

        RecurringCommands::Run { as_of } => {
            let transactions = TransactionService::with_notifier(storage, notifier);
            let generated = service.process_due(&transactions, as_of.unwrap_or_else(today))?;
            if generated.is_empty() {
                println!("Nothing due.");
            } else {
                println!("Generated {} transaction(s):", generated.len());
                println!(
                    "{}",
                    format_transaction_register(&generated, &category_names(storage)?)
                );
            }
        }
    }

    Ok(())
}
