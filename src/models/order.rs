use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, OrderItem as DomainOrderItem, OrderStatus,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub hub_id: i32,
    pub customer_id: i32,
    pub fisherman_id: i32,
    pub slot_id: Option<i32>,
    pub fulfillment_type: String,
    pub fulfillment_starts_at: NaiveDateTime,
    pub fulfillment_ends_at: NaiveDateTime,
    pub delivery_fee_cents: i32,
    pub subtotal_cents: i32,
    pub total_cents: i32,
    pub status: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub species: String,
    pub form: String,
    pub price_cents: i32,
    pub quantity_grams: i32,
    pub line_total_cents: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub hub_id: i32,
    pub customer_id: i32,
    pub fisherman_id: i32,
    pub slot_id: Option<i32>,
    pub fulfillment_type: &'a str,
    pub fulfillment_starts_at: NaiveDateTime,
    pub fulfillment_ends_at: NaiveDateTime,
    pub delivery_fee_cents: i32,
    pub subtotal_cents: i32,
    pub total_cents: i32,
    pub status: &'a str,
    pub contact_name: &'a str,
    pub contact_email: &'a str,
    pub contact_phone: &'a str,
    pub delivery_address: Option<&'a str>,
    pub notes: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub species: &'a str,
    pub form: &'a str,
    pub price_cents: i32,
    pub quantity_grams: i32,
    pub line_total_cents: i32,
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            hub_id: self.hub_id,
            customer_id: self.customer_id,
            fisherman_id: self.fisherman_id,
            slot_id: self.slot_id,
            fulfillment_type: self.fulfillment_type.as_str().into(),
            fulfillment_starts_at: self.fulfillment_starts_at,
            fulfillment_ends_at: self.fulfillment_ends_at,
            delivery_fee_cents: self.delivery_fee_cents,
            subtotal_cents: self.subtotal_cents,
            total_cents: self.total_cents,
            status: self.status.as_str().into(),
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            delivery_address: self.delivery_address,
            notes: self.notes,
            items: items.into_iter().map(OrderItem::into_domain).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrderItem {
    pub fn into_domain(self) -> DomainOrderItem {
        DomainOrderItem {
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            species: self.species,
            form: self.form.as_str().into(),
            price_cents: self.price_cents,
            quantity_grams: self.quantity_grams,
            line_total_cents: self.line_total_cents,
        }
    }
}

impl From<(Order, Vec<OrderItem>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl<'a> NewOrder<'a> {
    /// Row for `value` with the totals computed inside the placing transaction.
    pub fn from_domain(
        value: &'a DomainNewOrder,
        subtotal_cents: i32,
        delivery_fee_cents: i32,
        total_cents: i32,
    ) -> Self {
        Self {
            hub_id: value.hub_id,
            customer_id: value.customer_id,
            fisherman_id: value.fisherman_id,
            slot_id: Some(value.slot_id),
            fulfillment_type: value.fulfillment_type.into(),
            fulfillment_starts_at: value.fulfillment_starts_at,
            fulfillment_ends_at: value.fulfillment_ends_at,
            delivery_fee_cents,
            subtotal_cents,
            total_cents,
            status: OrderStatus::New.into(),
            contact_name: value.contact.name.as_str(),
            contact_email: value.contact.email.as_str(),
            contact_phone: value.contact.phone.as_str(),
            delivery_address: value.contact.delivery_address.as_deref(),
            notes: value.notes.as_deref(),
        }
    }
}
