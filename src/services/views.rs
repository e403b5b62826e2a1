//! View models shared by several pages and the JSON API.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::{
    default_price::DefaultPrice,
    order::{Order, OrderItem, OrderStatus, SoldOutItem},
    planned_trip::PlannedTrip,
    pricing::{format_cents, format_kg},
    product::{FishForm, Product},
    slot::{FulfillmentSlot, FulfillmentType},
};

pub fn fish_form_label(form: FishForm) -> &'static str {
    match form {
        FishForm::Whole => "целая",
        FishForm::Gutted => "потрошёная",
        FishForm::Fillet => "филе",
        FishForm::Steak => "стейк",
        FishForm::Smoked => "копчёная",
    }
}

pub fn order_status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::New => "Новый",
        OrderStatus::Confirmed => "Подтверждён",
        OrderStatus::Completed => "Выполнен",
        OrderStatus::Cancelled => "Отменён",
    }
}

pub fn fulfillment_label(kind: FulfillmentType) -> &'static str {
    match kind {
        FulfillmentType::Pickup => "Самовывоз",
        FulfillmentType::Delivery => "Доставка",
    }
}

/// Value/label pair rendered into `<select>` options.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn fish_form_options() -> Vec<SelectOption> {
    FishForm::ALL
        .into_iter()
        .map(|form| SelectOption {
            value: form.as_str(),
            label: fish_form_label(form),
        })
        .collect()
}

pub fn order_status_options() -> Vec<SelectOption> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| SelectOption {
            value: status.as_str(),
            label: order_status_label(status),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductView {
    pub id: i32,
    pub catch_id: Option<i32>,
    pub fisherman_id: i32,
    pub fisherman_name: String,
    pub species: String,
    pub form: FishForm,
    pub form_label: &'static str,
    pub price_cents: i32,
    pub price_formatted: String,
    pub available_grams: i32,
    pub available_kg: String,
    pub in_stock: bool,
    pub caught_on: NaiveDate,
}

impl ProductView {
    pub fn from_product(product: Product, names: &HashMap<i32, String>) -> Self {
        let fisherman_name = names
            .get(&product.fisherman_id)
            .cloned()
            .unwrap_or_default();
        let in_stock = product.in_stock();

        Self {
            id: product.id,
            catch_id: product.catch_id,
            fisherman_id: product.fisherman_id,
            fisherman_name,
            form_label: fish_form_label(product.form),
            price_formatted: format_cents(i64::from(product.price_cents)),
            available_kg: format_kg(product.available_grams),
            species: product.species,
            form: product.form,
            price_cents: product.price_cents,
            available_grams: product.available_grams,
            in_stock,
            caught_on: product.caught_on,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SlotView {
    pub id: i32,
    pub fisherman_id: i32,
    pub fisherman_name: String,
    pub kind: FulfillmentType,
    pub kind_label: &'static str,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    /// Fee charged when this slot is chosen, zero for pickup.
    pub delivery_fee_cents: i32,
    pub delivery_fee_formatted: String,
    /// Cart total including this slot's fee, set on the checkout page.
    pub order_total_formatted: Option<String>,
}

impl SlotView {
    pub fn from_slot(
        slot: FulfillmentSlot,
        names: &HashMap<i32, String>,
        fees: &HashMap<i32, i32>,
    ) -> Self {
        let delivery_fee_cents = match slot.kind {
            FulfillmentType::Delivery => fees.get(&slot.fisherman_id).copied().unwrap_or(0),
            FulfillmentType::Pickup => 0,
        };

        Self {
            id: slot.id,
            fisherman_id: slot.fisherman_id,
            fisherman_name: names.get(&slot.fisherman_id).cloned().unwrap_or_default(),
            kind: slot.kind,
            kind_label: fulfillment_label(slot.kind),
            starts_at: slot.starts_at,
            ends_at: slot.ends_at,
            delivery_fee_cents,
            delivery_fee_formatted: format_cents(i64::from(delivery_fee_cents)),
            order_total_formatted: None,
        }
    }

    /// Attach the order total for a cart worth `subtotal_cents`.
    pub fn with_order_total(mut self, subtotal_cents: i64) -> Self {
        let total = subtotal_cents + i64::from(self.delivery_fee_cents);
        self.order_total_formatted = Some(format_cents(total));
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TripView {
    pub id: i32,
    pub fisherman_id: i32,
    pub fisherman_name: String,
    pub trip_date: NaiveDate,
    pub note: Option<String>,
}

impl TripView {
    pub fn from_trip(trip: PlannedTrip, names: &HashMap<i32, String>) -> Self {
        Self {
            id: trip.id,
            fisherman_id: trip.fisherman_id,
            fisherman_name: names.get(&trip.fisherman_id).cloned().unwrap_or_default(),
            trip_date: trip.trip_date,
            note: trip.note,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DefaultPriceView {
    pub id: i32,
    pub species: String,
    pub form: FishForm,
    pub form_label: &'static str,
    pub price_cents: i32,
    pub price_formatted: String,
}

impl From<DefaultPrice> for DefaultPriceView {
    fn from(value: DefaultPrice) -> Self {
        Self {
            id: value.id,
            form_label: fish_form_label(value.form),
            price_formatted: format_cents(i64::from(value.price_cents)),
            species: value.species,
            form: value.form,
            price_cents: value.price_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrderItemView {
    pub product_id: Option<i32>,
    pub species: String,
    pub form_label: &'static str,
    pub price_formatted: String,
    pub quantity_kg: String,
    pub line_total_formatted: String,
}

impl From<OrderItem> for OrderItemView {
    fn from(value: OrderItem) -> Self {
        Self {
            product_id: value.product_id,
            form_label: fish_form_label(value.form),
            price_formatted: format_cents(i64::from(value.price_cents)),
            quantity_kg: format_kg(value.quantity_grams),
            line_total_formatted: format_cents(i64::from(value.line_total_cents)),
            species: value.species,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrderView {
    pub id: i32,
    pub customer_id: i32,
    pub fisherman_id: i32,
    pub status: OrderStatus,
    pub status_label: &'static str,
    /// Statuses the order may move to next.
    pub next_statuses: Vec<SelectOption>,
    pub fulfillment_type: FulfillmentType,
    pub fulfillment_label: &'static str,
    pub fulfillment_starts_at: NaiveDateTime,
    pub fulfillment_ends_at: NaiveDateTime,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub subtotal_formatted: String,
    pub delivery_fee_formatted: String,
    pub total_formatted: String,
    pub total_cents: i32,
    pub items: Vec<OrderItemView>,
    pub created_at: NaiveDateTime,
}

impl From<Order> for OrderView {
    fn from(value: Order) -> Self {
        let next_statuses = value
            .status
            .next_statuses()
            .into_iter()
            .map(|status| SelectOption {
                value: status.as_str(),
                label: order_status_label(status),
            })
            .collect();

        Self {
            id: value.id,
            customer_id: value.customer_id,
            fisherman_id: value.fisherman_id,
            status: value.status,
            status_label: order_status_label(value.status),
            next_statuses,
            fulfillment_type: value.fulfillment_type,
            fulfillment_label: fulfillment_label(value.fulfillment_type),
            fulfillment_starts_at: value.fulfillment_starts_at,
            fulfillment_ends_at: value.fulfillment_ends_at,
            contact_name: value.contact_name,
            contact_email: value.contact_email,
            contact_phone: value.contact_phone,
            delivery_address: value.delivery_address,
            notes: value.notes,
            subtotal_formatted: format_cents(i64::from(value.subtotal_cents)),
            delivery_fee_formatted: format_cents(i64::from(value.delivery_fee_cents)),
            total_formatted: format_cents(i64::from(value.total_cents)),
            total_cents: value.total_cents,
            items: value.items.into_iter().map(Into::into).collect(),
            created_at: value.created_at,
        }
    }
}

/// Human readable summary of a sold-out line, used in flash messages.
pub fn describe_sold_out(item: &SoldOutItem) -> String {
    let name = match item.form {
        Some(form) if !item.species.is_empty() => {
            format!("{} ({})", item.species, fish_form_label(form))
        }
        _ => format!("товар #{}", item.product_id),
    };

    format!(
        "{name}: запрошено {} кг, доступно {} кг",
        format_kg(item.requested_grams),
        format_kg(item.available_grams)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sold_out_description_handles_deleted_products() {
        let gone = SoldOutItem {
            product_id: 12,
            species: String::new(),
            form: None,
            requested_grams: 500,
            available_grams: 0,
        };
        assert_eq!(
            describe_sold_out(&gone),
            "товар #12: запрошено 0.5 кг, доступно 0 кг"
        );

        let short = SoldOutItem {
            product_id: 3,
            species: "Щука".to_string(),
            form: Some(FishForm::Fillet),
            requested_grams: 2000,
            available_grams: 1500,
        };
        assert_eq!(
            describe_sold_out(&short),
            "Щука (филе): запрошено 2 кг, доступно 1.5 кг"
        );
    }

    #[test]
    fn order_view_lists_allowed_transitions() {
        let ts = NaiveDateTime::parse_from_str("2025-01-01 10:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("timestamp");
        let order = Order {
            id: 1,
            hub_id: 1,
            customer_id: 2,
            fisherman_id: 3,
            slot_id: Some(4),
            fulfillment_type: FulfillmentType::Pickup,
            fulfillment_starts_at: ts,
            fulfillment_ends_at: ts,
            delivery_fee_cents: 0,
            subtotal_cents: 1250,
            total_cents: 1250,
            status: OrderStatus::Confirmed,
            contact_name: "A".to_string(),
            contact_email: "a@example.com".to_string(),
            contact_phone: "1".to_string(),
            delivery_address: None,
            notes: None,
            items: Vec::new(),
            created_at: ts,
            updated_at: ts,
        };

        let view = OrderView::from(order);

        let values: Vec<&str> = view.next_statuses.iter().map(|option| option.value).collect();
        assert_eq!(values, vec!["completed", "cancelled"]);
        assert_eq!(view.total_formatted, "12.50");
    }
}
