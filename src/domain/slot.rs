use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// How an order is handed over to the customer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentType {
    /// The customer collects the order at the fisherman's pickup address.
    Pickup,
    /// The fisherman delivers the order to the customer's address.
    Delivery,
}

impl FulfillmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
        }
    }
}

impl fmt::Display for FulfillmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown fulfillment type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fulfillment type `{0}`")]
pub struct UnknownFulfillmentType(pub String);

impl FromStr for FulfillmentType {
    type Err = UnknownFulfillmentType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            other => Err(UnknownFulfillmentType(other.to_string())),
        }
    }
}

impl From<&str> for FulfillmentType {
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_else(|err| {
            log::warn!("{err}, falling back to pickup");
            Self::Pickup
        })
    }
}

impl From<FulfillmentType> for &'static str {
    fn from(value: FulfillmentType) -> Self {
        value.as_str()
    }
}

/// Current server wall-clock time. Slot windows and trip dates are entered
/// as local time, so they must be compared against this and not UTC.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// A bookable pickup or delivery time window offered by a fisherman.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FulfillmentSlot {
    pub id: i32,
    pub hub_id: i32,
    /// Fisherman (admin user) offering the slot.
    pub fisherman_id: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub kind: FulfillmentType,
    pub created_at: NaiveDateTime,
}

impl FulfillmentSlot {
    /// Whether the slot can still be booked at `now`.
    pub fn is_bookable(&self, now: NaiveDateTime) -> bool {
        self.ends_at > now
    }
}

/// Payload required to insert a new slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFulfillmentSlot {
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub kind: FulfillmentType,
}

impl NewFulfillmentSlot {
    pub fn new(
        hub_id: i32,
        fisherman_id: i32,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
        kind: FulfillmentType,
    ) -> Self {
        Self {
            hub_id,
            fisherman_id,
            starts_at,
            ends_at,
            kind,
        }
    }
}

/// Query definition used to list slots for a hub.
#[derive(Debug, Clone)]
pub struct SlotListQuery {
    pub hub_id: i32,
    /// Only slots that end after this moment.
    pub ending_after: Option<NaiveDateTime>,
    pub fisherman_id: Option<i32>,
    pub kind: Option<FulfillmentType>,
}

impl SlotListQuery {
    /// Construct a query that targets all slots belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            ending_after: None,
            fisherman_id: None,
            kind: None,
        }
    }

    /// Keep only slots that are still open at `moment`.
    pub fn ending_after(mut self, moment: NaiveDateTime) -> Self {
        self.ending_after = Some(moment);
        self
    }

    pub fn fisherman_id(mut self, fisherman_id: i32) -> Self {
        self.fisherman_id = Some(fisherman_id);
        self
    }

    pub fn kind(mut self, kind: FulfillmentType) -> Self {
        self.kind = Some(kind);
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn slot_ending_at(ends_at: NaiveDateTime) -> FulfillmentSlot {
        FulfillmentSlot {
            id: 1,
            hub_id: 1,
            fisherman_id: 2,
            starts_at: ends_at - Duration::hours(2),
            ends_at,
            kind: FulfillmentType::Pickup,
            created_at: ends_at - Duration::days(1),
        }
    }

    #[test]
    fn local_now_is_server_wall_clock() {
        let wall_clock = chrono::Local::now().naive_local();
        let drift = (local_now() - wall_clock).num_seconds().abs();
        assert!(drift < 5);
    }

    #[test]
    fn slot_closes_at_its_local_end_time() {
        let wall_clock = chrono::Local::now().naive_local();

        let ended = slot_ending_at(wall_clock - Duration::minutes(1));
        assert!(!ended.is_bookable(local_now()));

        let open = slot_ending_at(wall_clock + Duration::minutes(10));
        assert!(open.is_bookable(local_now()));
    }

    #[test]
    fn parses_known_values_case_insensitively() {
        assert_eq!("Pickup".parse::<FulfillmentType>(), Ok(FulfillmentType::Pickup));
        assert_eq!(" delivery ".parse::<FulfillmentType>(), Ok(FulfillmentType::Delivery));
        assert!("drone".parse::<FulfillmentType>().is_err());
    }
}
