use std::fmt;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::Pagination;
use pushkind_common::routes::check_role;
use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;

/// Role of a local user record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Fisherman managing the shop.
    Admin,
    /// Regular shop customer.
    #[default]
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::Customer,
        }
    }
}

impl From<UserRole> for &'static str {
    fn from(value: UserRole) -> Self {
        value.as_str()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct User {
    pub id: i32,
    pub hub_id: i32,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// Identity snapshot used to upsert the local user row.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub hub_id: i32,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl NewUser {
    #[must_use]
    pub fn new(hub_id: i32, email: String, name: String, role: UserRole) -> Self {
        Self {
            hub_id,
            email: email.trim().to_lowercase(),
            name,
            role,
        }
    }
}

impl From<&AuthenticatedUser> for NewUser {
    fn from(value: &AuthenticatedUser) -> Self {
        let role = if check_role(SERVICE_ACCESS_ROLE, &value.roles) {
            UserRole::Admin
        } else {
            UserRole::Customer
        };
        NewUser::new(value.hub_id, value.email.clone(), value.name.clone(), role)
    }
}

/// Profile fields a user may edit. `None` on the outer option leaves the
/// column untouched, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub hub_id: i32,
    pub role: Option<UserRole>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            role: None,
            search: None,
            pagination: None,
        }
    }

    pub fn role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
