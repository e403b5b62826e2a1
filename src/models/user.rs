use chrono::{Local, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub hub_id: i32,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub hub_id: i32,
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

/// Columns refreshed from the identity provider on every upsert.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct RefreshUser<'a> {
    pub role: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
    pub avatar_url: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

impl From<User> for DomainUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            email: value.email,
            name: value.name,
            avatar_url: value.avatar_url,
            phone: value.phone,
            role: value.role.as_str().into(),
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            hub_id: value.hub_id,
            email: value.email.as_str(),
            name: value.name.as_str(),
            role: value.role.into(),
        }
    }
}

impl<'a> From<&'a DomainNewUser> for RefreshUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            role: value.role.into(),
            updated_at: Local::now().naive_utc(),
        }
    }
}

impl<'a> From<&'a DomainUpdateUser> for UpdateUser<'a> {
    fn from(value: &'a DomainUpdateUser) -> Self {
        Self {
            name: value.name.as_deref(),
            phone: value.phone.as_ref().map(|phone| phone.as_deref()),
            avatar_url: value.avatar_url.as_ref().map(|url| url.as_deref()),
            updated_at: Local::now().naive_utc(),
        }
    }
}
