use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::product::{FishForm, Product};

/// A batch of fish entered on a given date, split into one or more products.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Catch {
    pub id: i32,
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub caught_on: NaiveDate,
    pub notes: Option<String>,
    /// Products created from this catch.
    pub products: Vec<Product>,
    pub created_at: NaiveDateTime,
}

/// One species/form line of a catch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatchLine {
    pub species: String,
    pub form: FishForm,
    /// Price per kilogram in cents.
    pub price_cents: i32,
    /// Caught quantity in grams.
    pub quantity_grams: i32,
}

/// Payload required to record a catch together with its products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatch {
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub caught_on: NaiveDate,
    pub notes: Option<String>,
    pub lines: Vec<NewCatchLine>,
}

impl NewCatch {
    /// Build a catch payload without lines.
    pub fn new(hub_id: i32, fisherman_id: i32, caught_on: NaiveDate) -> Self {
        Self {
            hub_id,
            fisherman_id,
            caught_on,
            notes: None,
            lines: Vec::new(),
        }
    }

    /// Attach free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Append a product line.
    pub fn with_line(mut self, line: NewCatchLine) -> Self {
        self.lines.push(line);
        self
    }
}
