use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::subscription::{
    EmailSubscription as DomainEmailSubscription,
    NewEmailSubscription as DomainNewEmailSubscription,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::email_subscriptions)]
pub struct EmailSubscription {
    pub id: i32,
    pub hub_id: i32,
    pub email: String,
    pub unsubscribe_token: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::email_subscriptions)]
pub struct NewEmailSubscription<'a> {
    pub hub_id: i32,
    pub email: &'a str,
    pub unsubscribe_token: &'a str,
}

impl From<EmailSubscription> for DomainEmailSubscription {
    fn from(value: EmailSubscription) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            email: value.email,
            unsubscribe_token: value.unsubscribe_token,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewEmailSubscription> for NewEmailSubscription<'a> {
    fn from(value: &'a DomainNewEmailSubscription) -> Self {
        Self {
            hub_id: value.hub_id,
            email: value.email.as_str(),
            unsubscribe_token: value.unsubscribe_token.as_str(),
        }
    }
}
