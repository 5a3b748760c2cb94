//! User settings for the finance tracker
//!
//! Holds the local user profile, notification preferences and the email
//! delivery configuration. Secrets never live in the settings file: the
//! Mailgun API key is read from the environment at send time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::paths::TrackerPaths;
use crate::error::TrackerError;

pub const MAILGUN_API_KEY_ENV: &str = "MAILGUN_API_KEY";
pub const MAILGUN_DOMAIN_ENV: &str = "MAILGUN_DOMAIN";
pub const FROM_EMAIL_ENV: &str = "DEFAULT_FROM_EMAIL";

/// The single local user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default)]
    pub first_name: String,

    /// Where alerts and summaries are delivered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Currency used when a command does not name one
    #[serde(default = "default_currency")]
    pub preferred_currency: String,

    /// Summary and report emails
    #[serde(default = "default_true")]
    pub email_notifications: bool,

    /// Budget warning and overspend emails
    #[serde(default = "default_true")]
    pub budget_alert_notifications: bool,
}

impl UserProfile {
    /// Name used in email greetings
    pub fn display_name(&self) -> &str {
        if self.first_name.trim().is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            username: default_username(),
            first_name: String::new(),
            email: None,
            preferred_currency: default_currency(),
            email_notifications: true,
            budget_alert_notifications: true,
        }
    }
}

/// Which email transport to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailBackend {
    /// Write messages to the log only
    #[default]
    Console,
    /// Append messages to a local JSONL mailbox
    Outbox,
    /// Deliver through the Mailgun HTTP API
    Mailgun,
}

impl fmt::Display for EmailBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::Outbox => write!(f, "outbox"),
            Self::Mailgun => write!(f, "mailgun"),
        }
    }
}

impl FromStr for EmailBackend {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "outbox" => Ok(Self::Outbox),
            "mailgun" => Ok(Self::Mailgun),
            other => Err(TrackerError::Config(format!(
                "Unknown email backend '{}' (expected console, outbox or mailgun)",
                other
            ))),
        }
    }
}

/// Email delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub backend: EmailBackend,

    #[serde(default = "default_from_address")]
    pub from_address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailgun_domain: Option<String>,

    #[serde(default = "default_mailgun_base_url")]
    pub mailgun_base_url: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            backend: EmailBackend::default(),
            from_address: default_from_address(),
            mailgun_domain: None,
            mailgun_base_url: default_mailgun_base_url(),
        }
    }
}

impl EmailSettings {
    /// Settings with `MAILGUN_DOMAIN` and `DEFAULT_FROM_EMAIL` applied on top
    pub fn with_env_overrides(&self) -> Self {
        let mut resolved = self.clone();
        if let Some(domain) = non_empty_env(MAILGUN_DOMAIN_ENV) {
            resolved.mailgun_domain = Some(domain);
        }
        if let Some(from) = non_empty_env(FROM_EMAIL_ENV) {
            resolved.from_address = from;
        }
        resolved
    }

    /// The Mailgun API key from the environment
    pub fn mailgun_api_key() -> Option<String> {
        non_empty_env(MAILGUN_API_KEY_ENV)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// User settings for the finance tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub profile: UserProfile,

    #[serde(default)]
    pub email: EmailSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_username() -> String {
    "me".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_from_address() -> String {
    "noreply@fintrack.local".to_string()
}

fn default_mailgun_base_url() -> String {
    "https://api.mailgun.net".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            date_format: default_date_format(),
            profile: UserProfile::default(),
            email: EmailSettings::default(),
        }
    }
}

impl Settings {
    /// Currency applied to new records
    pub fn currency(&self) -> &str {
        &self.profile.preferred_currency
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &TrackerPaths) -> Result<Self, TrackerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TrackerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TrackerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrackerPaths) -> Result<(), TrackerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TrackerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency(), "USD");
        assert!(settings.profile.email_notifications);
        assert!(settings.profile.budget_alert_notifications);
        assert_eq!(settings.email.backend, EmailBackend::Console);
        assert!(settings.profile.email.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.profile.email = Some("sam@example.com".into());
        settings.profile.budget_alert_notifications = false;
        settings.email.backend = EmailBackend::Outbox;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.profile.email.as_deref(), Some("sam@example.com"));
        assert!(!loaded.profile.budget_alert_notifications);
        assert_eq!(loaded.email.backend, EmailBackend::Outbox);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"profile": {"first_name": "Priya"}}"#).unwrap();
        assert_eq!(settings.profile.display_name(), "Priya");
        assert_eq!(settings.profile.preferred_currency, "USD");
        assert_eq!(settings.email.mailgun_base_url, "https://api.mailgun.net");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let profile = UserProfile::default();
        assert_eq!(profile.display_name(), "me");
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("Mailgun".parse::<EmailBackend>().unwrap(), EmailBackend::Mailgun);
        assert!("smtp".parse::<EmailBackend>().is_err());
    }
}
