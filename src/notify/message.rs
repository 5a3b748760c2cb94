//! Outgoing email messages

use serde::{Deserialize, Serialize};

/// A rendered email ready for any [`Mailer`](super::Mailer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text_body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
}

impl EmailMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        text_body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: subject.into(),
            text_body: text_body.into(),
            html_body: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    /// The first `max_chars` characters of the plain-text body
    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.text_body.chars().take(max_chars).collect();
        if self.text_body.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }
}
