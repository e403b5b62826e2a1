use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::order::{OrderListQuery, OrderStatus};
use crate::forms::orders::ChangeOrderStatusForm;
use crate::mailer::Mailer;
use crate::repository::{OrderReader, OrderWriter};
use crate::services::notifications::{send_best_effort, status_changed_email};
use crate::services::views::{OrderView, SelectOption, order_status_options};
use crate::services::{ServiceError, ServiceResult, ensure_admin};

/// Query parameters accepted by the admin orders page.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Optional status filter, ignored when unknown.
    pub status: Option<String>,
    /// Search over the contact name, email and phone.
    pub search: Option<String>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
}

/// Data required to render the admin orders page.
pub struct OrdersPageData {
    pub orders: Paginated<OrderView>,
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub status_options: Vec<SelectOption>,
}

pub fn load_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    ensure_admin(user)?;

    let page = query.page.unwrap_or(1).max(1);
    let mut list_query = OrderListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let status = query
        .status
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| value.parse::<OrderStatus>().ok());
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;
    let views = orders.into_iter().map(OrderView::from).collect();
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(OrdersPageData {
        orders: Paginated::new(views, page, total_pages),
        search,
        status,
        status_options: order_status_options(),
    })
}

/// Moves an order to the requested status.
///
/// Illegal transitions are rejected with [`ServiceError::InvalidTransition`].
/// When the order changed status concurrently the compare-and-set fails and
/// [`ServiceError::Conflict`] is returned. Cancelling returns the stock.
pub fn change_order_status<R>(
    repo: &R,
    mailer: &dyn Mailer,
    user: &AuthenticatedUser,
    order_id: i32,
    form: ChangeOrderStatusForm,
) -> ServiceResult<OrderView>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    ensure_admin(user)?;

    let target = form
        .target_status()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let current = repo
        .get_order_by_id(order_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if !current.status.can_transition_to(target) {
        return Err(ServiceError::InvalidTransition {
            from: current.status,
            to: target,
        });
    }

    let updated = repo
        .transition_order(order_id, user.hub_id, current.status, target)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::Conflict)?;

    log::info!(
        "Order {order_id} moved from {} to {target} by {}",
        current.status,
        user.email
    );

    send_best_effort(mailer, status_changed_email(&updated));

    Ok(OrderView::from(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::order::Order;
    use crate::domain::slot::FulfillmentType;
    use crate::mailer::MockMailer;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{authenticated, datetime};

    fn order(id: i32, status: OrderStatus) -> Order {
        let ts = datetime("2025-06-01 09:00:00");
        Order {
            id,
            hub_id: 1,
            customer_id: 2,
            fisherman_id: 3,
            slot_id: Some(4),
            fulfillment_type: FulfillmentType::Pickup,
            fulfillment_starts_at: ts,
            fulfillment_ends_at: ts,
            delivery_fee_cents: 0,
            subtotal_cents: 1000,
            total_cents: 1000,
            status,
            contact_name: "Anna".to_string(),
            contact_email: "anna@example.com".to_string(),
            contact_phone: "+7 900".to_string(),
            delivery_address: None,
            notes: None,
            items: Vec::new(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn status_form(status: &str) -> ChangeOrderStatusForm {
        ChangeOrderStatusForm {
            status: status.to_string(),
        }
    }

    #[test]
    fn load_orders_requires_admin() {
        let repo = MockRepository::new();
        let result = load_orders(&repo, &authenticated(&[]), OrdersQuery::default());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn load_orders_applies_filters() {
        let mut repo = MockRepository::new();
        repo.expect_list_orders()
            .withf(|query| {
                query.status == Some(OrderStatus::Confirmed)
                    && query.search.as_deref() == Some("anna")
            })
            .returning(|_| Ok((1, vec![order(1, OrderStatus::Confirmed)])));

        let data = load_orders(
            &repo,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            OrdersQuery {
                status: Some("confirmed".to_string()),
                search: Some(" anna ".to_string()),
                page: None,
            },
        )
        .expect("orders load");

        assert_eq!(data.status, Some(OrderStatus::Confirmed));
        assert_eq!(data.search.as_deref(), Some("anna"));
    }

    #[test]
    fn confirming_new_order_notifies_customer() {
        let mut repo = MockRepository::new();
        repo.expect_get_order_by_id()
            .returning(|id, _| Ok(Some(order(id, OrderStatus::New))));
        repo.expect_transition_order()
            .withf(|_, _, from, to| *from == OrderStatus::New && *to == OrderStatus::Confirmed)
            .returning(|id, _, _, to| Ok(Some(order(id, to))));

        let mut mailer = MockMailer::new();
        mailer
            .expect_dispatch()
            .withf(|email| email.to == "anna@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let view = change_order_status(
            &repo,
            &mailer,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            5,
            status_form("confirmed"),
        )
        .expect("status changed");

        assert_eq!(view.status, OrderStatus::Confirmed);
    }

    #[test]
    fn terminal_orders_cannot_move() {
        let mut repo = MockRepository::new();
        repo.expect_get_order_by_id()
            .returning(|id, _| Ok(Some(order(id, OrderStatus::Completed))));
        repo.expect_transition_order().never();
        let mailer = MockMailer::new();

        let result = change_order_status(
            &repo,
            &mailer,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            5,
            status_form("cancelled"),
        );

        assert!(matches!(
            result,
            Err(ServiceError::InvalidTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Cancelled
            })
        ));
    }

    #[test]
    fn lost_compare_and_set_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_order_by_id()
            .returning(|id, _| Ok(Some(order(id, OrderStatus::Confirmed))));
        repo.expect_transition_order().returning(|_, _, _, _| Ok(None));
        let mut mailer = MockMailer::new();
        mailer.expect_dispatch().never();

        let result = change_order_status(
            &repo,
            &mailer,
            &authenticated(&[SERVICE_ACCESS_ROLE]),
            5,
            status_form("completed"),
        );

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn unknown_status_and_missing_order() {
        let mut repo = MockRepository::new();
        repo.expect_get_order_by_id().returning(|_, _| Ok(None));
        let mailer = MockMailer::new();
        let admin = authenticated(&[SERVICE_ACCESS_ROLE]);

        assert!(matches!(
            change_order_status(&repo, &mailer, &admin, 5, status_form("shipped")),
            Err(ServiceError::Form(_))
        ));
        assert!(matches!(
            change_order_status(&repo, &mailer, &admin, 5, status_form("confirmed")),
            Err(ServiceError::NotFound)
        ));
    }
}
