//! Report CLI commands

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};

use crate::config::settings::Settings;
use crate::display::report::{format_dashboard, format_financial_report, format_summary, format_trend};
use crate::error::{TrackerError, TrackerResult};
use crate::models::DateWindow;
use crate::notify::NotificationService;
use crate::reports::{Dashboard, FinancialReport, MonthlyTrend, PeriodSummary, ReportRange, DEFAULT_TREND_MONTHS};
use crate::storage::Storage;

use super::{category_names, parse_date, today};

const SUMMARY_TOP_CATEGORIES: usize = 10;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RangeArg {
    Daily,
    Weekly,
    Monthly,
}

/// Range and date options shared by report commands
#[derive(Debug, Clone, clap::Args)]
pub struct RangeOptions {
    /// daily, weekly or monthly (ignored with --from/--to)
    #[arg(short, long, value_enum, default_value = "monthly")]
    range: RangeArg,
    #[arg(long, value_parser = parse_date, requires = "to")]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date, requires = "from")]
    to: Option<NaiveDate>,
    /// Treat this date as today
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

impl RangeOptions {
    fn resolve(&self) -> TrackerResult<(ReportRange, NaiveDate)> {
        let today = self.today.unwrap_or_else(today);
        let range = match (self.from, self.to) {
            (Some(start), Some(end)) => ReportRange::custom(start, end)?,
            _ => match self.range {
                RangeArg::Daily => ReportRange::Daily,
                RangeArg::Weekly => ReportRange::Weekly,
                RangeArg::Monthly => ReportRange::Monthly,
            },
        };
        Ok((range, today))
    }
}

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income and expense summary
    Summary {
        #[command(flatten)]
        range: RangeOptions,
        /// Also email the summary to the profile address
        #[arg(long)]
        email: bool,
    },

    /// Dashboard for the current month or a custom window
    Dashboard {
        #[arg(long, value_parser = parse_date, requires = "to")]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date, requires = "from")]
        to: Option<NaiveDate>,
    },

    /// Income, expenses and savings per calendar month
    Trend {
        #[arg(short, long, default_value_t = DEFAULT_TREND_MONTHS)]
        months: u32,
    },

    /// Email a financial report
    Email {
        #[command(flatten)]
        range: RangeOptions,
        /// Send to this address instead of the profile email
        #[arg(long)]
        to_address: Option<String>,
    },
}

pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    notifier: &NotificationService,
    cmd: ReportCommands,
) -> TrackerResult<()> {
    let currency = settings.currency();

    match cmd {
        ReportCommands::Summary { range, email } => {
            let (range, today) = range.resolve()?;
            let summary = PeriodSummary::generate(storage, range.window(today), SUMMARY_TOP_CATEGORIES)?;
            println!("{} Summary", range.label());
            print!("{}", format_summary(&summary, currency));

            if email {
                if notifier.send_summary(&summary) {
                    println!("\nSummary emailed via {}.", notifier.mailer_name());
                } else {
                    println!("\nSummary was not emailed (check profile email and notification settings).");
                }
            }
        }

        ReportCommands::Dashboard { from, to } => {
            let dashboard = match (from, to) {
                (Some(start), Some(end)) => {
                    let window = DateWindow::new(start, end).ok_or_else(|| {
                        TrackerError::Validation(format!("Start {} is after end {}", start, end))
                    })?;
                    Dashboard::generate(storage, window)?
                }
                _ => Dashboard::current_month(storage, today())?,
            };
            print!(
                "{}",
                format_dashboard(&dashboard, &category_names(storage)?, currency)
            );
        }

        ReportCommands::Trend { months } => {
            let trend = MonthlyTrend::generate(storage, today(), months)?;
            print!("{}", format_trend(&trend, currency));
        }

        ReportCommands::Email { range, to_address } => {
            let (range, today) = range.resolve()?;
            let report = FinancialReport::generate(storage, range, today)?;
            print!("{}", format_financial_report(&report, currency));

            if notifier.send_report(&report, to_address.as_deref()) {
                println!("\nReport emailed via {}.", notifier.mailer_name());
            } else {
                return Err(TrackerError::Notification(
                    "Report was not sent; set a profile email or pass --to-address".into(),
                ));
            }
        }
    }

    Ok(())
}
