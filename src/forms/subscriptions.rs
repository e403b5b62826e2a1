use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::subscription::NewEmailSubscription;
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

const SUBJECT_MAX_LEN: usize = 200;
const SUBJECT_MAX_LEN_VALIDATOR: u64 = SUBJECT_MAX_LEN as u64;

const BODY_MAX_LEN: usize = 20_000;
const BODY_MAX_LEN_VALIDATOR: u64 = BODY_MAX_LEN as u64;

#[derive(Debug, Error)]
pub enum SubscriptionFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("subject and message cannot be empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribeForm {
    #[validate(email)]
    pub email: String,
}

impl SubscribeForm {
    pub fn into_new_subscription(
        self,
        hub_id: i32,
    ) -> Result<NewEmailSubscription, SubscriptionFormError> {
        let form = Self {
            email: self.email.trim().to_string(),
        };
        form.validate()?;
        Ok(NewEmailSubscription::new(hub_id, form.email))
    }
}

/// Token from the link in a broadcast email.
#[derive(Debug, Clone, Deserialize)]
pub struct UnsubscribeForm {
    pub token: String,
}

/// Message sent to every subscriber.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BroadcastForm {
    #[validate(length(min = 1, max = SUBJECT_MAX_LEN_VALIDATOR))]
    pub subject: String,
    #[validate(length(min = 1, max = BODY_MAX_LEN_VALIDATOR))]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastMessage {
    pub subject: String,
    pub body: String,
}

impl BroadcastForm {
    pub fn into_message(self) -> Result<BroadcastMessage, SubscriptionFormError> {
        self.validate()?;

        let subject = sanitize_inline_text(&self.subject);
        let body = sanitize_multiline_text(&self.body);
        if subject.is_empty() || body.is_empty() {
            return Err(SubscriptionFormError::EmptyMessage);
        }

        Ok(BroadcastMessage { subject, body })
    }
}
