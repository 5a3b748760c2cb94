use anyhow::Result;
use clap::{Parser, Subcommand};

use finance_tracker::cli::{
    handle_budget_command, handle_category_command, handle_profile_command,
    handle_recurring_command, handle_report_command, handle_transaction_command,
};
use finance_tracker::config::{paths::TrackerPaths, settings::Settings, EmailBackend};
use finance_tracker::display::format_history;
use finance_tracker::logging::{init_tracing, LOG_ENV};
use finance_tracker::notify::{ConsoleMailer, NotificationService};
use finance_tracker::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracker with budgets and email alerts",
    long_about = "fintrack records income and expenses by category, tracks spending \
                  against daily, weekly, monthly or yearly budgets, and emails you \
                  when a budget reaches its alert threshold."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default categories
    Init,

    /// Show paths and settings, or change email delivery
    Config {
        /// console, outbox or mailgun
        #[arg(long)]
        email_backend: Option<EmailBackend>,
        #[arg(long)]
        from_address: Option<String>,
        #[arg(long)]
        mailgun_domain: Option<String>,
    },

    /// Profile and notification preferences
    #[command(subcommand)]
    Profile(finance_tracker::cli::ProfileCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(finance_tracker::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(finance_tracker::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(finance_tracker::cli::BudgetCommands),

    /// Recurring transaction commands
    #[command(subcommand)]
    Recurring(finance_tracker::cli::RecurringCommands),

    /// Summaries, dashboard, trend and emailed reports
    #[command(subcommand)]
    Report(finance_tracker::cli::ReportCommands),

    /// Show the most recent changes from the audit log
    History {
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = TrackerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let notifier = match NotificationService::from_settings(&settings, &paths) {
        Ok(notifier) => notifier,
        Err(e) => {
            tracing::warn!(error = %e, "email backend unavailable, falling back to console");
            NotificationService::new(
                settings.profile.clone(),
                settings.email.from_address.clone(),
                Box::new(ConsoleMailer),
            )
        }
    };

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing fintrack at: {}", paths.base_dir().display());
            let created = initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if created > 0 {
                println!();
                println!("{} default categories have been created.", created);
                println!("Run 'fintrack category list' to see them.");
            }
        }
        Some(Commands::Config {
            email_backend,
            from_address,
            mailgun_domain,
        }) => {
            let changed =
                email_backend.is_some() || from_address.is_some() || mailgun_domain.is_some();
            if let Some(backend) = email_backend {
                settings.email.backend = backend;
            }
            if let Some(from) = from_address {
                settings.email.from_address = from;
            }
            if let Some(domain) = mailgun_domain {
                settings.email.mailgun_domain = Some(domain);
            }
            if changed {
                settings.save(&paths)?;
                println!("Configuration saved.");
                println!();
            }

            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Email:");
            println!("  Backend:      {}", settings.email.backend);
            println!("  From:         {}", settings.email.from_address);
            if let Some(domain) = &settings.email.mailgun_domain {
                println!("  Mailgun:      {}", domain);
            }
            println!();
            println!("Log filter: set {} (e.g. {}=debug)", LOG_ENV, LOG_ENV);
        }
        Some(Commands::Profile(cmd)) => {
            handle_profile_command(&storage, &paths, &mut settings, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, &notifier, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Recurring(cmd)) => {
            handle_recurring_command(&storage, &settings, &notifier, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, &notifier, cmd)?;
        }
        Some(Commands::History { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            println!("{}", format_history(&entries));
        }
        None => {
            println!("fintrack - personal finance tracker");
            println!();
            println!("Run 'fintrack --help' for usage information.");
            if !storage.is_initialized() {
                println!("Run 'fintrack init' to get started.");
            }
        }
    }

    Ok(())
}
