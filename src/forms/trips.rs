use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::planned_trip::NewPlannedTrip;
use crate::forms::optional_inline;

const NOTE_MAX_LEN: usize = 256;
const NOTE_MAX_LEN_VALIDATOR: u64 = NOTE_MAX_LEN as u64;

#[derive(Debug, Error)]
pub enum TripFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("trip date is in the past")]
    InThePast,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddTripForm {
    pub trip_date: String,
    #[validate(length(max = NOTE_MAX_LEN_VALIDATOR))]
    pub note: Option<String>,
}

impl AddTripForm {
    pub fn into_new_trip(
        self,
        hub_id: i32,
        fisherman_id: i32,
        today: NaiveDate,
    ) -> Result<NewPlannedTrip, TripFormError> {
        self.validate()?;

        let trip_date = NaiveDate::parse_from_str(self.trip_date.trim(), "%Y-%m-%d")
            .map_err(|_| TripFormError::InvalidDate(self.trip_date.clone()))?;

        if trip_date < today {
            return Err(TripFormError::InThePast);
        }

        let mut trip = NewPlannedTrip::new(hub_id, fisherman_id, trip_date);
        if let Some(note) = optional_inline(self.note.as_deref()) {
            trip = trip.with_note(note);
        }

        Ok(trip)
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteTripForm {
    pub trip_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    #[test]
    fn converts_trip_with_note() {
        let form = AddTripForm {
            trip_date: "2025-06-01".to_string(),
            note: Some("  Lake  Ladoga ".to_string()),
        };

        let trip = form.into_new_trip(1, 3, today()).expect("valid trip");

        assert_eq!(trip.trip_date, today());
        assert_eq!(trip.note.as_deref(), Some("Lake Ladoga"));
    }

    #[test]
    fn rejects_past_and_malformed_dates() {
        let past = AddTripForm {
            trip_date: "2025-05-31".to_string(),
            note: None,
        };
        assert!(matches!(
            past.into_new_trip(1, 3, today()),
            Err(TripFormError::InThePast)
        ));

        let malformed = AddTripForm {
            trip_date: "next week".to_string(),
            note: None,
        };
        assert!(matches!(
            malformed.into_new_trip(1, 3, today()),
            Err(TripFormError::InvalidDate(_))
        ));
    }
}
