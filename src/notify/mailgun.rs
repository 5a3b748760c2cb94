//! Mailgun HTTP API transport

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{TrackerError, TrackerResult};

use super::mailer::Mailer;
use super::message::EmailMessage;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct MailgunResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: String,
}

pub struct MailgunMailer {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl MailgunMailer {
    pub fn new(base_url: &str, domain: String, api_key: String) -> TrackerResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: messages_endpoint(base_url, &domain),
            api_key,
        })
    }
}

fn messages_endpoint(base_url: &str, domain: &str) -> String {
    format!("{}/v3/{}/messages", base_url.trim_end_matches('/'), domain)
}

fn parse_response(body: &str) -> Option<MailgunResponse> {
    serde_json::from_str(body).ok()
}

impl Mailer for MailgunMailer {
    fn send(&self, message: &EmailMessage) -> TrackerResult<()> {
        let to = message.to.join(",");
        let mut form = vec![
            ("from", message.from.as_str()),
            ("to", to.as_str()),
            ("subject", message.subject.as_str()),
            ("text", message.text_body.as_str()),
        ];
        if let Some(html) = &message.html_body {
            form.push(("html", html.as_str()));
        }

        let res = self
            .client
            .post(&self.endpoint)
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().unwrap_or_default();
            return Err(TrackerError::Notification(format!(
                "Mailgun API error (status {}): {}",
                status, err_text
            )));
        }

        // Delivery is decided by the status; the body is informational only.
        let body = res.text().unwrap_or_default();
        match parse_response(&body) {
            Some(parsed) => {
                tracing::info!(id = ?parsed.id, response = %parsed.message, "email accepted by Mailgun");
            }
            None => tracing::info!(response = %body, "email accepted by Mailgun"),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mailgun"
    }
}
