//! Email notifications
//!
//! Messages are rendered by `templates`, delivered through a [`Mailer`] and
//! gated on the profile's notification preferences by
//! [`NotificationService`].

pub mod mailer;
pub mod mailgun;
pub mod message;
pub mod service;
pub mod templates;

pub use mailer::{build_mailer, ConsoleMailer, Mailer, MemoryMailer, OutboxMailer};
pub use mailgun::MailgunMailer;
pub use message::EmailMessage;
pub use service::NotificationService;
