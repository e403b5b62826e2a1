use std::collections::HashMap;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::repository::errors::RepositoryError;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::order::{OrderStatus, SoldOutItem};
use crate::domain::user::{NewUser, User, UserListQuery, UserRole};
use crate::repository::{UserReader, UserWriter};

pub mod cart;
pub mod catches;
pub mod checkout;
pub mod notifications;
pub mod orders;
pub mod prices;
pub mod profile;
pub mod slots;
pub mod storefront;
pub mod subscribers;
pub mod trips;
pub mod views;

/// Errors surfaced by the service layer to the routes.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("invalid form: {0}")]
    Form(String),
    #[error("{} item(s) are sold out", .0.len())]
    SoldOut(Vec<SoldOutItem>),
    #[error("order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(())
}

/// Upsert the local user row for the authenticated identity in `hub_id`.
pub(crate) fn sync_user<R>(repo: &R, user: &AuthenticatedUser, hub_id: i32) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let mut new_user = NewUser::from(user);
    new_user.hub_id = hub_id;
    repo.upsert_user(&new_user).map_err(ServiceError::from)
}

/// Local user row of an admin acting as a fisherman in their own hub.
pub(crate) fn sync_fisherman<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_admin(user)?;
    sync_user(repo, user, user.hub_id)
}

/// Display names of every fisherman in the hub keyed by user id.
pub(crate) fn fisherman_names<R>(repo: &R, hub_id: i32) -> ServiceResult<HashMap<i32, String>>
where
    R: UserReader + ?Sized,
{
    let (_, admins) = repo
        .list_users(UserListQuery::new(hub_id).role(UserRole::Admin))
        .map_err(ServiceError::from)?;

    Ok(admins.into_iter().map(|user| (user.id, user.name)).collect())
}
