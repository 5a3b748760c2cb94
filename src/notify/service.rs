//! Notification service
//!
//! Decides whether a message should go out for the current profile, renders
//! it and hands it to the configured [`Mailer`]. Delivery problems never
//! propagate to the caller: a failed send is logged, previewed on the
//! console and reported as `false`.

use crate::config::paths::TrackerPaths;
use crate::config::settings::{Settings, UserProfile};
use crate::error::TrackerResult;
use crate::models::BudgetStatus;
use crate::reports::{FinancialReport, PeriodSummary};

use super::mailer::{build_mailer, Mailer};
use super::message::EmailMessage;
use super::templates::{self, Rendered};

/// Characters of the body echoed to the console when delivery fails
pub const FALLBACK_PREVIEW_CHARS: usize = 500;

pub struct NotificationService {
    profile: UserProfile,
    from_address: String,
    mailer: Box<dyn Mailer>,
}

impl NotificationService {
    pub fn new(profile: UserProfile, from_address: impl Into<String>, mailer: Box<dyn Mailer>) -> Self {
        Self {
            profile,
            from_address: from_address.into(),
            mailer,
        }
    }

    /// Build from the saved settings, selecting the configured mailer
    pub fn from_settings(settings: &Settings, paths: &TrackerPaths) -> TrackerResult<Self> {
        let email = settings.email.with_env_overrides();
        let mailer = build_mailer(&email, paths)?;
        Ok(Self::new(settings.profile.clone(), email.from_address, mailer))
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn mailer_name(&self) -> &'static str {
        self.mailer.name()
    }

    /// Deliver a message, returning whether the mailer accepted it
    pub fn send(&self, message: &EmailMessage) -> bool {
        match self.mailer.send(message) {
            Ok(()) => {
                tracing::info!(
                    mailer = self.mailer.name(),
                    to = %message.to.join(", "),
                    subject = %message.subject,
                    "email sent"
                );
                true
            }
            Err(e) => {
                tracing::error!(mailer = self.mailer.name(), error = %e, "failed to send email");
                eprintln!("=== EMAIL (delivery failed, console fallback) ===");
                eprintln!("To: {}", message.to.join(", "));
                eprintln!("Subject: {}", message.subject);
                eprintln!("{}", message.preview(FALLBACK_PREVIEW_CHARS));
                eprintln!("=================================================");
                false
            }
        }
    }

    /// Tell the user a budget crossed its threshold or was exceeded
    ///
    /// Skipped when budget alerts are turned off or no address is on file.
    pub fn send_budget_alert(&self, category_name: &str, status: &BudgetStatus) -> bool {
        if !self.profile.budget_alert_notifications {
            tracing::debug!(category = category_name, "budget alerts disabled; not sending");
            return false;
        }
        let Some(to) = self.profile.email.clone() else {
            tracing::warn!(category = category_name, "no email address on profile; budget alert not sent");
            return false;
        };

        let rendered = templates::budget_alert(&self.profile, category_name, status);
        self.send(&self.compose(to, rendered))
    }

    /// Email a period summary; requires email notifications to be on
    pub fn send_summary(&self, summary: &PeriodSummary) -> bool {
        if !self.profile.email_notifications {
            tracing::debug!("email notifications disabled; summary not sent");
            return false;
        }
        let Some(to) = self.profile.email.clone() else {
            tracing::warn!("no email address on profile; summary not sent");
            return false;
        };

        let rendered = templates::summary(&self.profile, summary);
        self.send(&self.compose(to, rendered))
    }

    /// Email a full report on request, optionally to another address
    pub fn send_report(&self, report: &FinancialReport, recipient: Option<&str>) -> bool {
        let Some(to) = recipient
            .map(str::to_string)
            .or_else(|| self.profile.email.clone())
        else {
            tracing::warn!("no recipient for report");
            return false;
        };

        let rendered = templates::report(&self.profile, report);
        self.send(&self.compose(to, rendered))
    }

    fn compose(&self, to: String, rendered: Rendered) -> EmailMessage {
        EmailMessage::new(&self.from_address, to, rendered.subject, rendered.text)
            .with_html(rendered.html)
    }
}
