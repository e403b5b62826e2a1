use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::product::FishForm;

/// Default price per kilogram a fisherman charges for a species/form pair.
/// Used to pre-fill new catch entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefaultPrice {
    pub id: i32,
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub species: String,
    pub form: FishForm,
    pub price_cents: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insert-or-replace payload keyed by `(fisherman_id, species, form)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertDefaultPrice {
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub species: String,
    pub form: FishForm,
    pub price_cents: i32,
}

impl UpsertDefaultPrice {
    pub fn new(
        hub_id: i32,
        fisherman_id: i32,
        species: impl Into<String>,
        form: FishForm,
        price_cents: i32,
    ) -> Self {
        Self {
            hub_id,
            fisherman_id,
            species: species.into(),
            form,
            price_cents,
        }
    }
}

/// Lookup of the default price for `species`/`form`, comparing species
/// case-insensitively.
pub fn find_default_price<'a>(
    prices: &'a [DefaultPrice],
    species: &str,
    form: FishForm,
) -> Option<&'a DefaultPrice> {
    prices
        .iter()
        .find(|price| price.form == form && price.species.eq_ignore_ascii_case(species.trim()))
}
