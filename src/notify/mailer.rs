//! Email transports
//!
//! Everything that sends mail goes through the [`Mailer`] trait so the
//! notification logic never depends on a particular transport.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::paths::TrackerPaths;
use crate::config::settings::{EmailBackend, EmailSettings};
use crate::error::{TrackerError, TrackerResult};
use crate::storage::file_io::append_json_line;

use super::mailgun::MailgunMailer;
use super::message::EmailMessage;

pub trait Mailer {
    /// Deliver one message
    fn send(&self, message: &EmailMessage) -> TrackerResult<()>;

    /// Short transport name for logs
    fn name(&self) -> &'static str;
}

/// Prints messages to stdout instead of delivering them
#[derive(Debug, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    /// The text printed for one message
    pub fn render(message: &EmailMessage) -> String {
        format!(
            "=== EMAIL ===\nFrom: {}\nTo: {}\nSubject: {}\n\n{}\n=============",
            message.from,
            message.to.join(", "),
            message.subject,
            message.text_body.trim_end()
        )
    }
}

impl Mailer for ConsoleMailer {
    fn send(&self, message: &EmailMessage) -> TrackerResult<()> {
        tracing::info!(
            to = %message.to.join(", "),
            subject = %message.subject,
            "email (console backend)"
        );
        println!("{}", Self::render(message));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

/// Appends messages to a local JSONL mailbox
#[derive(Debug)]
pub struct OutboxMailer {
    path: PathBuf,
}

impl OutboxMailer {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Every message delivered so far, oldest first
    pub fn read_all(&self) -> TrackerResult<Vec<EmailMessage>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(TrackerError::from))
            .collect()
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, message: &EmailMessage) -> TrackerResult<()> {
        append_json_line(&self.path, message)?;
        tracing::debug!(path = %self.path.display(), subject = %message.subject, "queued email in outbox");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "outbox"
    }
}

/// Keeps messages in memory; clones share the same mailbox
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail: bool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Messages accepted so far
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, message: &EmailMessage) -> TrackerResult<()> {
        if self.fail {
            return Err(TrackerError::Notification("memory mailer set to fail".into()));
        }
        self.sent
            .lock()
            .map_err(|e| TrackerError::Notification(format!("mailbox lock poisoned: {}", e)))?
            .push(message.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Build the transport selected in the settings
///
/// Environment overrides are applied first. Selecting Mailgun without a
/// domain or API key is a configuration error.
pub fn build_mailer(settings: &EmailSettings, paths: &TrackerPaths) -> TrackerResult<Box<dyn Mailer>> {
    let resolved = settings.with_env_overrides();
    match resolved.backend {
        EmailBackend::Console => Ok(Box::new(ConsoleMailer)),
        EmailBackend::Outbox => Ok(Box::new(OutboxMailer::new(paths.outbox_file()))),
        EmailBackend::Mailgun => {
            let domain = resolved.mailgun_domain.clone().ok_or_else(|| {
                TrackerError::Config("Mailgun backend selected but no domain is configured".into())
            })?;
            let api_key = EmailSettings::mailgun_api_key().ok_or_else(|| {
                TrackerError::Config(
                    "Mailgun backend selected but MAILGUN_API_KEY is not set".into(),
                )
            })?;
            Ok(Box::new(MailgunMailer::new(
                &resolved.mailgun_base_url,
                domain,
                api_key,
            )?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn message(subject: &str) -> EmailMessage {
        EmailMessage::new("from@x", "to@x", subject, "body")
    }

    #[test]
    fn test_outbox_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let outbox = OutboxMailer::new(temp_dir.path().join("outbox.jsonl"));
        assert!(outbox.read_all().unwrap().is_empty());

        outbox.send(&message("one")).unwrap();
        outbox.send(&message("two")).unwrap();

        let stored = outbox.read_all().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].subject, "two");
    }

    #[test]
    fn test_console_render() {
        let rendered = ConsoleMailer::render(&message("Budget Alert: Food"));
        assert!(rendered.contains("To: to@x"));
        assert!(rendered.contains("Subject: Budget Alert: Food"));
        assert!(rendered.contains("body"));
        assert!(ConsoleMailer.send(&message("hi")).is_ok());
    }

    #[test]
    fn test_memory_mailer_shares_mailbox() {
        let mailer = MemoryMailer::new();
        let handle = mailer.clone();
        mailer.send(&message("hi")).unwrap();
        assert_eq!(handle.sent().len(), 1);

        assert!(MemoryMailer::failing().send(&message("hi")).is_err());
    }

    #[test]
    fn test_build_mailer_selects_backend() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = EmailSettings::default();
        assert_eq!(build_mailer(&settings, &paths).unwrap().name(), "console");

        settings.backend = EmailBackend::Outbox;
        assert_eq!(build_mailer(&settings, &paths).unwrap().name(), "outbox");
    }
}
