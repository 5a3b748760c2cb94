//! Transaction CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::TrackerResult;
use crate::models::{EntryKind, Money};
use crate::notify::NotificationService;
use crate::services::{
    CategoryService, CreateTransactionInput, TransactionChanges, TransactionFilter,
    TransactionService,
};
use crate::storage::Storage;

use super::{
    category_names, currency_or_default, format_alert_lines, parse_date, parse_money, today,
};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction; its kind comes from the category
    Add {
        /// Category name or ID
        category: String,
        /// Amount (e.g., "12.50")
        #[arg(value_parser = parse_money)]
        amount: Money,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(short = 'm', long)]
        description: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Currency code, defaults to the profile currency
        #[arg(long)]
        currency: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Filter by category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Only income or only expense
        #[arg(short, long)]
        kind: Option<EntryKind>,
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// Move to another category
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long, value_parser = parse_money)]
        amount: Option<Money>,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(short = 'm', long)]
        description: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    notifier: &NotificationService,
    cmd: TransactionCommands,
) -> TrackerResult<()> {
    let service = TransactionService::with_notifier(storage, notifier);
    let categories = CategoryService::new(storage);

    match cmd {
        TransactionCommands::Add {
            category,
            amount,
            date,
            description,
            notes,
            currency,
        } => {
            let category = categories.require(&category)?;
            let mut input = CreateTransactionInput::new(
                category.id,
                date.unwrap_or_else(today),
                amount,
                currency_or_default(currency, settings),
            );
            input.description = description;
            input.notes = notes;

            let (txn, alerts) = service.create_with_alerts(input)?;
            println!("Recorded {} {}", txn.kind.as_str(), txn);
            println!("  ID: {}", txn.id);
            if !alerts.is_empty() {
                println!("Budget alerts:");
                print!("{}", format_alert_lines(&category.name, &alerts));
            }
        }

        TransactionCommands::List {
            category,
            kind,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(category) = category {
                filter = filter.category(categories.require(&category)?.id);
            }
            if let Some(kind) = kind {
                filter = filter.kind(kind);
            }
            filter.start_date = from;
            filter.end_date = to;

            let transactions = service.list(filter)?;
            println!(
                "{}",
                format_transaction_register(&transactions, &category_names(storage)?)
            );
        }

        TransactionCommands::Show { id } => {
            let txn = service.require(&id)?;
            let name = categories
                .get(txn.category_id)?
                .map(|c| c.name)
                .unwrap_or_default();
            print!("{}", format_transaction_details(&txn, &name));
        }

        TransactionCommands::Edit {
            id,
            category,
            amount,
            date,
            description,
            notes,
        } => {
            let txn = service.require(&id)?;
            let category_id = match category {
                Some(category) => Some(categories.require(&category)?.id),
                None => None,
            };

            let (updated, alerts) = service.update_with_alerts(
                txn.id,
                TransactionChanges {
                    category_id,
                    date,
                    amount,
                    description,
                    notes,
                },
            )?;
            println!("Updated transaction: {}", updated);
            if !alerts.is_empty() {
                let name = categories
                    .get(updated.category_id)?
                    .map(|c| c.name)
                    .unwrap_or_default();
                println!("Budget alerts:");
                print!("{}", format_alert_lines(&name, &alerts));
            }
        }

        TransactionCommands::Delete { id } => {
            let txn = service.require(&id)?;
            let deleted = service.delete(txn.id)?;
            println!("Deleted transaction: {}", deleted);
        }
    }

    Ok(())
}
