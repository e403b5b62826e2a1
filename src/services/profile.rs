use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::{
    fisherman_profile::FishermanProfile,
    order::OrderListQuery,
    user::User,
};
use crate::forms::profile::{CustomerProfileForm, FishermanProfileForm};
use crate::repository::{
    FishermanProfileReader, FishermanProfileWriter, OrderReader, UserWriter,
};
use crate::services::views::OrderView;
use crate::services::{ServiceError, ServiceResult, sync_fisherman, sync_user};

/// Data required to render the customer profile page.
pub struct CustomerProfileData {
    pub user: User,
    /// The customer's own orders, newest first.
    pub orders: Vec<OrderView>,
}

pub fn load_customer_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hub_id: i32,
) -> ServiceResult<CustomerProfileData>
where
    R: UserWriter + OrderReader + ?Sized,
{
    let local = sync_user(repo, user, hub_id)?;

    let (_, orders) = repo
        .list_orders(OrderListQuery::new(hub_id).customer_id(local.id))
        .map_err(ServiceError::from)?;

    Ok(CustomerProfileData {
        user: local,
        orders: orders.into_iter().map(OrderView::from).collect(),
    })
}

pub fn update_customer_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hub_id: i32,
    form: CustomerProfileForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let updates = form
        .into_update_user()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let local = sync_user(repo, user, hub_id)?;
    repo.update_user(local.id, hub_id, &updates)
        .map_err(ServiceError::from)
}

/// Stored profile of the acting fisherman, `None` until first saved.
pub fn load_fisherman_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Option<FishermanProfile>>
where
    R: FishermanProfileReader + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    repo.get_profile_by_user(fisherman.id, user.hub_id)
        .map_err(ServiceError::from)
}

pub fn save_fisherman_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: FishermanProfileForm,
) -> ServiceResult<FishermanProfile>
where
    R: FishermanProfileWriter + UserWriter + ?Sized,
{
    let fisherman = sync_fisherman(repo, user)?;

    let upsert = form
        .into_upsert(user.hub_id, fisherman.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.upsert_profile(&upsert).map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::user::UserRole;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{authenticated, datetime, local_user};

    #[test]
    fn customer_profile_lists_own_orders_only() {
        let mut repo = MockRepository::new();
        repo.expect_upsert_user()
            .withf(|new_user| new_user.hub_id == 7)
            .returning(|_| Ok(local_user(5, UserRole::Customer)));
        repo.expect_list_orders()
            .withf(|query| query.customer_id == Some(5) && query.hub_id == 7)
            .returning(|_| Ok((0, Vec::new())));

        let data = load_customer_profile(&repo, &authenticated(&[]), 7).expect("profile loads");

        assert_eq!(data.user.id, 5);
        assert!(data.orders.is_empty());
    }

    #[test]
    fn customer_update_clears_blank_fields() {
        let mut repo = MockRepository::new();
        repo.expect_upsert_user()
            .returning(|_| Ok(local_user(5, UserRole::Customer)));
        repo.expect_update_user()
            .withf(|id, _, updates| {
                *id == 5
                    && updates.name.as_deref() == Some("Anna K")
                    && updates.phone == Some(None)
                    && updates.avatar_url == Some(None)
            })
            .returning(|id, _, _| Ok(local_user(id, UserRole::Customer)));

        let form = CustomerProfileForm {
            name: " Anna   K ".to_string(),
            phone: Some(String::new()),
            avatar_url: None,
        };

        assert!(update_customer_profile(&repo, &authenticated(&[]), 1, form).is_ok());
    }

    #[test]
    fn fisherman_profile_requires_admin() {
        let repo = MockRepository::new();
        let result = load_fisherman_profile(&repo, &authenticated(&[]));
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn fisherman_profile_is_saved_for_acting_user() {
        let mut repo = MockRepository::new();
        repo.expect_upsert_user()
            .returning(|_| Ok(local_user(10, UserRole::Admin)));
        repo.expect_upsert_profile()
            .withf(|upsert| {
                upsert.user_id == 10 && upsert.delivery_fee_cents == 350 && !upsert.is_displayed
            })
            .returning(|upsert| {
                Ok(FishermanProfile {
                    id: 1,
                    hub_id: upsert.hub_id,
                    user_id: upsert.user_id,
                    pickup_address: upsert.pickup_address.clone(),
                    delivery_fee_cents: upsert.delivery_fee_cents,
                    public_phone: upsert.public_phone.clone(),
                    homepage_note: upsert.homepage_note.clone(),
                    is_displayed: upsert.is_displayed,
                    created_at: datetime("2025-06-01 00:00:00"),
                    updated_at: upsert.updated_at,
                })
            });

        let form = FishermanProfileForm {
            pickup_address: Some("Pier 3".to_string()),
            delivery_fee: Some("3.50".to_string()),
            public_phone: None,
            homepage_note: None,
            is_displayed: None,
        };

        let saved = save_fisherman_profile(&repo, &authenticated(&[SERVICE_ACCESS_ROLE]), form)
            .expect("profile saved");

        assert_eq!(saved.pickup_address.as_deref(), Some("Pier 3"));
    }
}
