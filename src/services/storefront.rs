use chrono::NaiveDateTime;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::repository::errors::RepositoryError;
use serde::Deserialize;

use crate::domain::{
    fisherman_profile::FishermanCard,
    planned_trip::PlannedTripListQuery,
    product::ProductListQuery,
    slot::SlotListQuery,
    subscription::EmailSubscription,
};
use crate::forms::subscriptions::SubscribeForm;
use crate::repository::{
    FishermanProfileReader, PlannedTripReader, ProductReader, SlotReader, SubscriptionWriter,
    UserReader,
};
use crate::services::views::{ProductView, SlotView, TripView};
use crate::services::{ServiceError, ServiceResult, fisherman_names};

/// Query parameters accepted by the storefront.
#[derive(Debug, Default, Deserialize)]
pub struct StorefrontQuery {
    /// Species search term.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the public storefront.
pub struct StorefrontPageData {
    pub products: Paginated<ProductView>,
    pub search: Option<String>,
    pub fishermen: Vec<FishermanCard>,
    pub trips: Vec<TripView>,
    pub slots: Vec<SlotView>,
}

/// Loads the storefront: in-stock products, displayed fishermen, upcoming
/// trips and slots.
pub fn load_storefront<R>(
    repo: &R,
    hub_id: i32,
    query: StorefrontQuery,
    now: NaiveDateTime,
) -> ServiceResult<StorefrontPageData>
where
    R: ProductReader
        + FishermanProfileReader
        + PlannedTripReader
        + SlotReader
        + UserReader
        + ?Sized,
{
    let StorefrontQuery { search, page } = query;
    let search = search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let page = page.unwrap_or(1).max(1);
    let mut list_query = ProductListQuery::new(hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, items) = repo.list_products(list_query).map_err(ServiceError::from)?;
    let names = fisherman_names(repo, hub_id)?;

    let view_items: Vec<ProductView> = items
        .into_iter()
        .map(|product| ProductView::from_product(product, &names))
        .collect();
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    let fishermen = repo
        .list_fisherman_cards(hub_id, true)
        .map_err(ServiceError::from)?;

    let fees = fishermen
        .iter()
        .map(|card| (card.profile.user_id, card.profile.delivery_fee_cents))
        .collect();

    let trips = repo
        .list_planned_trips(PlannedTripListQuery::new(hub_id).from(now.date()))
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|trip| TripView::from_trip(trip, &names))
        .collect();

    let slots = repo
        .list_slots(SlotListQuery::new(hub_id).ending_after(now))
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|slot| SlotView::from_slot(slot, &names, &fees))
        .collect();

    Ok(StorefrontPageData {
        products: Paginated::new(view_items, page, total_pages),
        search,
        fishermen,
        trips,
        slots,
    })
}

/// In-stock products for the JSON API.
pub fn list_available_products<R>(repo: &R, hub_id: i32) -> ServiceResult<Vec<ProductView>>
where
    R: ProductReader + UserReader + ?Sized,
{
    let (_, items) = repo
        .list_products(ProductListQuery::new(hub_id))
        .map_err(ServiceError::from)?;
    let names = fisherman_names(repo, hub_id)?;

    Ok(items
        .into_iter()
        .map(|product| ProductView::from_product(product, &names))
        .collect())
}

/// Stores the address. Subscribing twice is not an error.
pub fn subscribe_email<R>(
    repo: &R,
    hub_id: i32,
    form: SubscribeForm,
) -> ServiceResult<EmailSubscription>
where
    R: SubscriptionWriter + ?Sized,
{
    let subscription = form
        .into_new_subscription(hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.subscribe(&subscription).map_err(ServiceError::from)
}

/// Removes the address identified by its unsubscribe token; unknown tokens
/// are ignored.
pub fn unsubscribe_email<R>(repo: &R, hub_id: i32, token: &str) -> ServiceResult<()>
where
    R: SubscriptionWriter + ?Sized,
{
    let token = token.trim();
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ServiceError::Form("invalid unsubscribe token".to_string()));
    }

    match repo.unsubscribe(token, hub_id) {
        Ok(()) | Err(RepositoryError::NotFound) => Ok(()),
        Err(err) => Err(ServiceError::from(err)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::planned_trip::PlannedTrip;
    use crate::domain::slot::FulfillmentType;
    use crate::domain::user::UserRole;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{datetime, local_user, product, slot};

    #[test]
    fn storefront_lists_stock_trips_and_slots() {
        let now = datetime("2025-06-01 08:00:00");

        let mut repo = MockRepository::new();
        repo.expect_list_products()
            .withf(|query| {
                !query.include_sold_out && query.search.as_deref() == Some("pike")
            })
            .returning(|_| Ok((1, vec![product(1, 1250, 3000)])));
        repo.expect_list_users().returning(|_| {
            let mut fisher = local_user(10, UserRole::Admin);
            fisher.name = "Ivan".to_string();
            Ok((1, vec![fisher]))
        });
        repo.expect_list_fisherman_cards()
            .withf(|_, displayed_only| *displayed_only)
            .returning(|_, _| Ok(Vec::new()));
        repo.expect_list_planned_trips()
            .withf(move |query| query.from == Some(now.date()))
            .returning(move |_| {
                Ok(vec![PlannedTrip {
                    id: 1,
                    hub_id: 1,
                    fisherman_id: 10,
                    trip_date: NaiveDate::from_ymd_opt(2025, 6, 3).expect("date"),
                    note: None,
                    created_at: now,
                }])
            });
        repo.expect_list_slots()
            .withf(move |query| query.ending_after == Some(now))
            .returning(|_| {
                Ok(vec![slot(
                    4,
                    FulfillmentType::Pickup,
                    "2025-06-02 10:00:00",
                    "2025-06-02 12:00:00",
                )])
            });

        let data = load_storefront(
            &repo,
            1,
            StorefrontQuery {
                search: Some("  pike ".to_string()),
                page: None,
            },
            now,
        )
        .expect("storefront loads");

        assert_eq!(data.search.as_deref(), Some("pike"));
        assert_eq!(data.trips.len(), 1);
        assert_eq!(data.trips[0].fisherman_name, "Ivan");
        assert_eq!(data.slots.len(), 1);
    }

    #[test]
    fn subscribe_rejects_invalid_email() {
        let mut repo = MockRepository::new();
        repo.expect_subscribe().never();

        let result = subscribe_email(
            &repo,
            1,
            SubscribeForm {
                email: "not-an-email".to_string(),
            },
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn subscribe_stores_address() {
        let mut repo = MockRepository::new();
        repo.expect_subscribe()
            .withf(|subscription| subscription.email == "fan@example.com")
            .returning(|subscription| {
                Ok(EmailSubscription {
                    id: 1,
                    hub_id: subscription.hub_id,
                    email: subscription.email.clone(),
                    unsubscribe_token: subscription.unsubscribe_token.clone(),
                    created_at: datetime("2025-06-01 08:00:00"),
                })
            });

        let stored = subscribe_email(
            &repo,
            1,
            SubscribeForm {
                email: " fan@example.com ".to_string(),
            },
        )
        .expect("subscribed");

        assert_eq!(stored.email, "fan@example.com");
    }

    #[test]
    fn unsubscribe_ignores_unknown_token() {
        let mut repo = MockRepository::new();
        repo.expect_unsubscribe()
            .withf(|token, _| token == "abc123")
            .returning(|_, _| Err(RepositoryError::NotFound));

        assert!(unsubscribe_email(&repo, 1, " abc123 ").is_ok());
    }

    #[test]
    fn unsubscribe_rejects_malformed_token() {
        let mut repo = MockRepository::new();
        repo.expect_unsubscribe().never();

        assert!(matches!(
            unsubscribe_email(&repo, 1, "fan@example.com"),
            Err(ServiceError::Form(_))
        ));
        assert!(matches!(
            unsubscribe_email(&repo, 1, "  "),
            Err(ServiceError::Form(_))
        ));
    }
}
