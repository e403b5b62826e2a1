use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::product::FishForm;
use crate::domain::slot::FulfillmentType;

/// Possible lifecycle states of an order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed and awaits the fisherman's confirmation.
    #[default]
    New,
    /// The fisherman accepted the order.
    Confirmed,
    /// The order was handed over to the customer.
    Completed,
    /// The order was cancelled and its stock returned.
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::New,
        OrderStatus::Confirmed,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// `new -> confirmed | cancelled`, `confirmed -> completed | cancelled`.
    /// Completed and cancelled orders are final.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::Confirmed)
                | (Self::New, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }

    /// Statuses reachable from `self`, in display order.
    pub fn next_statuses(&self) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown order status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status `{0}`")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or(UnknownOrderStatus(normalized))
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_else(|err| {
            log::warn!("{err}, falling back to new");
            Self::New
        })
    }
}

impl From<OrderStatus> for &'static str {
    fn from(value: OrderStatus) -> Self {
        value.as_str()
    }
}

/// A line of a placed order. Species, form and price are snapshots taken
/// when the order was placed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    /// Product the line was taken from; `None` once the product is deleted.
    pub product_id: Option<i32>,
    pub species: String,
    pub form: FishForm,
    /// Price per kilogram in cents at order time.
    pub price_cents: i32,
    pub quantity_grams: i32,
    pub line_total_cents: i32,
}

/// Domain representation of a customer's order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique identifier of the order.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Customer (local user id) who placed the order.
    pub customer_id: i32,
    /// Fisherman owning the chosen fulfillment slot.
    pub fisherman_id: i32,
    /// Chosen slot; `None` once the slot is deleted.
    pub slot_id: Option<i32>,
    pub fulfillment_type: FulfillmentType,
    /// Snapshot of the slot window at order time.
    pub fulfillment_starts_at: NaiveDateTime,
    pub fulfillment_ends_at: NaiveDateTime,
    pub delivery_fee_cents: i32,
    pub subtotal_cents: i32,
    pub total_cents: i32,
    /// Current lifecycle status of the order.
    pub status: OrderStatus,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    /// Timestamp for when the order record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the order record.
    pub updated_at: NaiveDateTime,
}

/// Requested product and quantity of an order being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: i32,
    pub quantity_grams: i32,
}

/// Contact snapshot stored with the order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub delivery_address: Option<String>,
}

/// Payload required to place an order. Prices are read and snapshotted by the
/// repository inside the placing transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub hub_id: i32,
    pub customer_id: i32,
    pub fisherman_id: i32,
    pub slot_id: i32,
    pub fulfillment_type: FulfillmentType,
    pub fulfillment_starts_at: NaiveDateTime,
    pub fulfillment_ends_at: NaiveDateTime,
    /// Fee in cents; only charged for delivery orders.
    pub delivery_fee_cents: i32,
    pub contact: OrderContact,
    pub notes: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

/// A requested line that could not be reserved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoldOutItem {
    pub product_id: i32,
    /// Species of the product, empty when the product no longer exists.
    pub species: String,
    pub form: Option<FishForm>,
    pub requested_grams: i32,
    /// Quantity left at the time of the attempt.
    pub available_grams: i32,
}

/// Result of an order placement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// Stock was reserved and the order stored.
    Placed(Order),
    /// At least one line exceeded the available stock; nothing was written.
    SoldOut(Vec<SoldOutItem>),
}

/// Query definition used to list orders for a hub.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional status filter.
    pub status: Option<OrderStatus>,
    /// Optional customer identifier filter.
    pub customer_id: Option<i32>,
    /// Optional search term matched against the contact snapshot.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    /// Construct a query that targets all orders belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            status: None,
            customer_id: None,
            search: None,
            pagination: None,
        }
    }

    /// Filter the results by the provided status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter the results by customer identifier.
    pub fn customer_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Filter the results by a search term applied to the contact fields.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_transitions_are_legal() {
        use OrderStatus::*;

        assert!(New.can_transition_to(Confirmed));
        assert!(New.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!New.can_transition_to(Completed));
        assert!(!New.can_transition_to(New));
        assert!(!Cancelled.can_transition_to(New));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn final_statuses_have_no_successors() {
        assert!(OrderStatus::Completed.next_statuses().is_empty());
        assert!(OrderStatus::Cancelled.next_statuses().is_empty());
        assert_eq!(
            OrderStatus::New.next_statuses(),
            vec![OrderStatus::Confirmed, OrderStatus::Cancelled]
        );
    }

    #[test]
    fn unknown_status_falls_back_to_new() {
        assert_eq!(OrderStatus::from("shipped"), OrderStatus::New);
        assert_eq!(OrderStatus::from("CONFIRMED"), OrderStatus::Confirmed);
    }
}
