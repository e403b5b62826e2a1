use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

const UNSUBSCRIBE_TOKEN_LEN: usize = 32;

/// Random alphanumeric token identifying a subscription in unsubscribe links.
pub fn generate_unsubscribe_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(UNSUBSCRIBE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Standalone email opt-in, unrelated to user accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailSubscription {
    pub id: i32,
    pub hub_id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub unsubscribe_token: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmailSubscription {
    pub hub_id: i32,
    pub email: String,
    /// Stored only when the address is new; an existing row keeps its token.
    pub unsubscribe_token: String,
}

impl NewEmailSubscription {
    /// Build a subscription payload with the email normalised to lowercase
    /// and a fresh unsubscribe token.
    pub fn new(hub_id: i32, email: impl Into<String>) -> Self {
        Self {
            hub_id,
            email: email.into().trim().to_lowercase(),
            unsubscribe_token: generate_unsubscribe_token(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriptionListQuery {
    pub hub_id: i32,
    pub pagination: Option<Pagination>,
}

impl SubscriptionListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_subscription_gets_a_random_token() {
        let first = NewEmailSubscription::new(1, " Fan@Example.com ");
        let second = NewEmailSubscription::new(1, "fan@example.com");

        assert_eq!(first.email, "fan@example.com");
        assert_eq!(first.unsubscribe_token.len(), UNSUBSCRIBE_TOKEN_LEN);
        assert!(first.unsubscribe_token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first.unsubscribe_token, second.unsubscribe_token);
    }
}
