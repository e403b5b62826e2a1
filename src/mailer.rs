//! Transactional email delivery.
//!
//! Messages are handed to the [`Mailer`] and sent in the background; callers
//! never wait for the email API and a delivery failure is only logged.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::EmailConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("email API is not configured: {0}")]
    Config(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A single plain-text email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
        }
    }
}

/// Queues emails for delivery. Implementations must not block the caller.
#[cfg_attr(test, mockall::automock)]
pub trait Mailer: Send + Sync {
    fn dispatch(&self, email: OutgoingEmail) -> Result<(), MailerError>;
}

#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Sends emails through the JSON email API.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, MailerError> {
        let api_url = config
            .api_url
            .clone()
            .ok_or_else(|| MailerError::Config("EMAIL_API_URL".to_string()))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| MailerError::Config("EMAIL_API_KEY".to_string()))?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_url,
            api_key,
            from: config.from.clone(),
        })
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let payload = EmailPayload {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
        };

        self.client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

impl Mailer for HttpMailer {
    fn dispatch(&self, email: OutgoingEmail) -> Result<(), MailerError> {
        let mailer = self.clone();
        actix_web::rt::spawn(async move {
            match mailer.send(&email).await {
                Ok(()) => log::info!("Email `{}` sent to {}", email.subject, email.to),
                Err(err) => log::error!("Failed to send email to {}: {err}", email.to),
            }
        });
        Ok(())
    }
}

/// Writes emails to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn dispatch(&self, email: OutgoingEmail) -> Result<(), MailerError> {
        log::info!(
            "Email API not configured, would send `{}` to {}:\n{}",
            email.subject,
            email.to,
            email.text
        );
        Ok(())
    }
}

/// Pick the HTTP mailer when the API is configured, the logging one otherwise.
pub fn build_mailer(config: &EmailConfig) -> Arc<dyn Mailer> {
    if !config.is_enabled() {
        return Arc::new(LogMailer);
    }

    match HttpMailer::new(config) {
        Ok(mailer) => Arc::new(mailer),
        Err(err) => {
            log::error!("Falling back to logging mailer: {err}");
            Arc::new(LogMailer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_uses_log_mailer() {
        let config = EmailConfig {
            api_url: Some("https://mail.example.com/send".to_string()),
            api_key: None,
            from: "noreply@example.com".to_string(),
        };

        let mailer = build_mailer(&config);
        assert!(mailer.dispatch(OutgoingEmail::new("a@b.c", "s", "t")).is_ok());
    }

    #[test]
    fn http_mailer_requires_url_and_key() {
        let config = EmailConfig::default();
        assert!(matches!(HttpMailer::new(&config), Err(MailerError::Config(_))));
    }
}
