use std::collections::HashMap;

use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::{Deserialize, Serialize};

use crate::domain::{
    cart::Cart,
    order::{NewOrder, Order, OrderContact, PlacementOutcome},
    slot::{FulfillmentSlot, FulfillmentType, SlotListQuery},
    user::UpdateUser,
};
use crate::forms::checkout::CheckoutForm;
use crate::mailer::Mailer;
use crate::repository::{
    FishermanProfileReader, OrderReader, OrderWriter, ProductReader, SlotReader, UserReader,
    UserWriter,
};
use crate::services::cart::{CartView, load_cart};
use crate::services::notifications::{new_order_email, order_received_email, send_best_effort};
use crate::services::views::{OrderView, SlotView};
use crate::services::{ServiceError, ServiceResult, fisherman_names, sync_user};

/// Query parameters accepted by the checkout page.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    /// Slot whose delivery fee is included in the summary.
    pub slot_id: Option<i32>,
}

/// Contact details pre-filled on the checkout page.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ContactPrefill {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug)]
pub struct CheckoutPageData {
    /// Priced with the fee of `selected_slot_id` when one is chosen.
    pub cart: CartView,
    pub slots: Vec<SlotView>,
    pub selected_slot_id: Option<i32>,
    pub contact: ContactPrefill,
}

/// Default delivery fee of every fisherman in the hub keyed by user id.
fn delivery_fees<R>(repo: &R, hub_id: i32) -> ServiceResult<HashMap<i32, i32>>
where
    R: FishermanProfileReader + ?Sized,
{
    let cards = repo
        .list_fisherman_cards(hub_id, false)
        .map_err(ServiceError::from)?;

    Ok(cards
        .into_iter()
        .map(|card| (card.profile.user_id, card.profile.delivery_fee_cents))
        .collect())
}

fn delivery_fee_for<R>(repo: &R, slot: &FulfillmentSlot) -> ServiceResult<i32>
where
    R: FishermanProfileReader + ?Sized,
{
    if slot.kind != FulfillmentType::Delivery {
        return Ok(0);
    }

    let profile = repo
        .get_profile_by_user(slot.fisherman_id, slot.hub_id)
        .map_err(ServiceError::from)?;

    Ok(profile.map(|profile| profile.delivery_fee_cents).unwrap_or(0))
}

pub fn load_checkout<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hub_id: i32,
    cart: &Cart,
    selected_slot: Option<i32>,
    now: NaiveDateTime,
) -> ServiceResult<CheckoutPageData>
where
    R: ProductReader + SlotReader + FishermanProfileReader + UserReader + ?Sized,
{
    let names = fisherman_names(repo, hub_id)?;
    let fees = delivery_fees(repo, hub_id)?;
    let slots: Vec<SlotView> = repo
        .list_slots(SlotListQuery::new(hub_id).ending_after(now))
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|slot| SlotView::from_slot(slot, &names, &fees))
        .collect();

    let selected = selected_slot
        .and_then(|id| slots.iter().find(|slot| slot.id == id))
        .map(|slot| (slot.id, slot.kind, slot.delivery_fee_cents));

    let cart_view = match selected {
        Some((_, kind, fee)) => load_cart(repo, hub_id, cart, Some(kind), fee)?,
        None => load_cart(repo, hub_id, cart, None, 0)?,
    };

    let slots = slots
        .into_iter()
        .map(|slot| slot.with_order_total(cart_view.subtotal_cents))
        .collect();

    let stored = repo
        .get_user_by_email(&user.email, hub_id)
        .map_err(ServiceError::from)?;

    let contact = match stored {
        Some(stored) => ContactPrefill {
            name: stored.name,
            email: stored.email,
            phone: stored.phone.unwrap_or_default(),
        },
        None => ContactPrefill {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: String::new(),
        },
    };

    Ok(CheckoutPageData {
        cart: cart_view,
        slots,
        selected_slot_id: selected.map(|(id, _, _)| id),
        contact,
    })
}

/// Place the order for the cart contents.
///
/// Stock is reserved by the repository in one transaction; a sold-out result
/// is returned as [`ServiceError::SoldOut`] with every failing line and leaves
/// the stock untouched. Notification emails are best effort.
#[allow(clippy::too_many_arguments)]
pub fn place_order<R>(
    repo: &R,
    mailer: &dyn Mailer,
    user: &AuthenticatedUser,
    hub_id: i32,
    cart: &Cart,
    form: CheckoutForm,
    now: NaiveDateTime,
    currency: &str,
) -> ServiceResult<Order>
where
    R: SlotReader + FishermanProfileReader + UserReader + UserWriter + OrderWriter + ?Sized,
{
    let payload = form
        .into_payload()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if cart.is_empty() {
        return Err(ServiceError::Form("Корзина пуста.".to_string()));
    }

    let slot = repo
        .get_slot_by_id(payload.slot_id, hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if !slot.is_bookable(now) {
        return Err(ServiceError::Form(
            "Выбранный интервал уже недоступен.".to_string(),
        ));
    }

    if slot.kind == FulfillmentType::Delivery && payload.delivery_address.is_none() {
        return Err(ServiceError::Form(
            "Для доставки укажите адрес.".to_string(),
        ));
    }

    let customer = sync_user(repo, user, hub_id)?;
    if customer.phone.is_none() {
        let updates = UpdateUser {
            phone: Some(Some(payload.contact_phone.clone())),
            ..UpdateUser::default()
        };
        if let Err(err) = repo.update_user(customer.id, hub_id, &updates) {
            log::warn!("Failed to store phone for user {}: {err}", customer.id);
        }
    }

    let delivery_fee_cents = delivery_fee_for(repo, &slot)?;

    let new_order = NewOrder {
        hub_id,
        customer_id: customer.id,
        fisherman_id: slot.fisherman_id,
        slot_id: slot.id,
        fulfillment_type: slot.kind,
        fulfillment_starts_at: slot.starts_at,
        fulfillment_ends_at: slot.ends_at,
        delivery_fee_cents,
        contact: OrderContact {
            name: payload.contact_name,
            email: customer.email.clone(),
            phone: payload.contact_phone,
            delivery_address: payload.delivery_address,
        },
        notes: payload.notes,
        lines: cart.order_lines(),
    };

    let order = match repo.place_order(&new_order).map_err(ServiceError::from)? {
        PlacementOutcome::Placed(order) => order,
        PlacementOutcome::SoldOut(items) => return Err(ServiceError::SoldOut(items)),
    };

    log::info!(
        "Order {} placed by user {} for {} line(s)",
        order.id,
        customer.id,
        order.items.len()
    );

    match repo.get_user_by_id(order.fisherman_id, hub_id) {
        Ok(Some(fisherman)) => send_best_effort(
            mailer,
            new_order_email(&order, &fisherman.email, currency),
        ),
        Ok(None) => log::warn!("Fisherman {} of order {} not found", order.fisherman_id, order.id),
        Err(err) => log::error!("Failed to load fisherman for order {}: {err}", order.id),
    }
    send_best_effort(mailer, order_received_email(&order, currency));

    Ok(order)
}

/// Order confirmation page. Only the customer who placed the order may see it.
pub fn load_thank_you<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hub_id: i32,
    order_id: i32,
) -> ServiceResult<OrderView>
where
    R: OrderReader + UserReader + ?Sized,
{
    let customer = repo
        .get_user_by_email(&user.email, hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let order = repo
        .get_order_by_id(order_id, hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if order.customer_id != customer.id {
        return Err(ServiceError::NotFound);
    }

    Ok(OrderView::from(order))
}
