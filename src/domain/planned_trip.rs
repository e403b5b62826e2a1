use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A day a fisherman intends to go fishing, shown on the public calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedTrip {
    pub id: i32,
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub trip_date: NaiveDate,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlannedTrip {
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub trip_date: NaiveDate,
    pub note: Option<String>,
}

impl NewPlannedTrip {
    pub fn new(hub_id: i32, fisherman_id: i32, trip_date: NaiveDate) -> Self {
        Self {
            hub_id,
            fisherman_id,
            trip_date,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Query definition used to list planned trips.
#[derive(Debug, Clone)]
pub struct PlannedTripListQuery {
    pub hub_id: i32,
    /// Only trips on or after this date.
    pub from: Option<NaiveDate>,
    pub fisherman_id: Option<i32>,
}

impl PlannedTripListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            from: None,
            fisherman_id: None,
        }
    }

    pub fn from(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    pub fn fisherman_id(mut self, fisherman_id: i32) -> Self {
        self.fisherman_id = Some(fisherman_id);
        self
    }
}
