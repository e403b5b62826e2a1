use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::slot::{FulfillmentType, NewFulfillmentSlot};

/// `datetime-local` inputs post `YYYY-MM-DDTHH:MM`, optionally with seconds.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

pub type SlotFormResult<T> = Result<T, SlotFormError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotFormError {
    #[error("invalid date and time `{0}`")]
    InvalidDateTime(String),
    #[error("unknown slot kind `{0}`")]
    UnknownKind(String),
    #[error("slot must end after it starts")]
    EndsBeforeStart,
    #[error("slot has already ended")]
    InThePast,
}

fn parse_datetime(raw: &str) -> SlotFormResult<NaiveDateTime> {
    let trimmed = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| SlotFormError::InvalidDateTime(trimmed.to_string()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSlotForm {
    pub starts_at: String,
    pub ends_at: String,
    pub kind: String,
}

impl AddSlotForm {
    pub fn into_new_slot(
        self,
        hub_id: i32,
        fisherman_id: i32,
        now: NaiveDateTime,
    ) -> SlotFormResult<NewFulfillmentSlot> {
        let starts_at = parse_datetime(&self.starts_at)?;
        let ends_at = parse_datetime(&self.ends_at)?;

        if ends_at <= starts_at {
            return Err(SlotFormError::EndsBeforeStart);
        }

        if ends_at <= now {
            return Err(SlotFormError::InThePast);
        }

        let kind: FulfillmentType = self
            .kind
            .parse()
            .map_err(|_| SlotFormError::UnknownKind(self.kind.trim().to_string()))?;

        Ok(NewFulfillmentSlot::new(
            hub_id,
            fisherman_id,
            starts_at,
            ends_at,
            kind,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteSlotForm {
    pub slot_id: i32,
}
