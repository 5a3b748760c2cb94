//! Profile CLI commands

use clap::Subcommand;

use crate::audit::EntityType;
use crate::config::paths::TrackerPaths;
use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::transaction::validate_currency;
use crate::storage::Storage;

/// Profile subcommands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile and notification preferences
    Show,

    /// Change profile fields
    Set {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        /// Address for alerts and reports
        #[arg(long, conflicts_with = "clear_email")]
        email: Option<String>,
        /// Remove the email address
        #[arg(long)]
        clear_email: bool,
        /// Three-letter currency code for new records
        #[arg(long)]
        currency: Option<String>,
        /// Summary and report emails on or off
        #[arg(long)]
        email_notifications: Option<bool>,
        /// Budget alert emails on or off
        #[arg(long)]
        budget_alerts: Option<bool>,
    },
}

pub fn handle_profile_command(
    storage: &Storage,
    paths: &TrackerPaths,
    settings: &mut Settings,
    cmd: ProfileCommands,
) -> TrackerResult<()> {
    match cmd {
        ProfileCommands::Show => {
            let profile = &settings.profile;
            println!("Profile: {}", profile.username);
            if !profile.first_name.is_empty() {
                println!("  First name:          {}", profile.first_name);
            }
            println!(
                "  Email:               {}",
                profile.email.as_deref().unwrap_or("(not set)")
            );
            println!("  Currency:            {}", profile.preferred_currency);
            println!("  Email notifications: {}", on_off(profile.email_notifications));
            println!("  Budget alerts:       {}", on_off(profile.budget_alert_notifications));
            println!("  Email backend:       {}", settings.email.backend);
        }

        ProfileCommands::Set {
            username,
            first_name,
            email,
            clear_email,
            currency,
            email_notifications,
            budget_alerts,
        } => {
            let before = settings.profile.clone();
            let profile = &mut settings.profile;

            if let Some(username) = username {
                let username = username.trim();
                if username.is_empty() {
                    return Err(TrackerError::Validation("Username cannot be empty".into()));
                }
                profile.username = username.to_string();
            }
            if let Some(first_name) = first_name {
                profile.first_name = first_name.trim().to_string();
            }
            if let Some(email) = email {
                let email = email.trim();
                if !email.contains('@') {
                    return Err(TrackerError::Validation(format!(
                        "'{}' is not an email address",
                        email
                    )));
                }
                profile.email = Some(email.to_string());
            }
            if clear_email {
                profile.email = None;
            }
            if let Some(currency) = currency {
                let currency = currency.trim().to_uppercase();
                validate_currency(&currency).map_err(|e| TrackerError::Validation(e.to_string()))?;
                profile.preferred_currency = currency;
            }
            if let Some(enabled) = email_notifications {
                profile.email_notifications = enabled;
            }
            if let Some(enabled) = budget_alerts {
                profile.budget_alert_notifications = enabled;
            }

            settings.save(paths)?;
            storage.log_update(
                EntityType::Settings,
                "profile",
                Some(settings.profile.username.clone()),
                &before,
                &settings.profile,
            )?;
            println!("Profile updated.");
        }
    }

    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
