use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Preparation form a fish is sold in.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FishForm {
    /// Whole fish as caught.
    Whole,
    /// Whole fish with the guts removed.
    Gutted,
    /// Boneless fillets.
    Fillet,
    /// Cross-cut steaks.
    Steak,
    /// Smoked fish.
    Smoked,
}

impl FishForm {
    /// Every form in the order they are offered in the admin forms.
    pub const ALL: [FishForm; 5] = [
        FishForm::Whole,
        FishForm::Gutted,
        FishForm::Fillet,
        FishForm::Steak,
        FishForm::Smoked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whole => "whole",
            Self::Gutted => "gutted",
            Self::Fillet => "fillet",
            Self::Steak => "steak",
            Self::Smoked => "smoked",
        }
    }
}

impl fmt::Display for FishForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown fish form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fish form `{0}`")]
pub struct UnknownFishForm(pub String);

impl FromStr for FishForm {
    type Err = UnknownFishForm;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        FishForm::ALL
            .into_iter()
            .find(|form| form.as_str() == normalized)
            .ok_or(UnknownFishForm(normalized))
    }
}

impl From<&str> for FishForm {
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_else(|err| {
            log::warn!("{err}, falling back to whole");
            Self::Whole
        })
    }
}

impl From<FishForm> for &'static str {
    fn from(value: FishForm) -> Self {
        value.as_str()
    }
}

/// Domain representation of a batch of fish offered for sale.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Fisherman (admin user) who caught the fish.
    pub fisherman_id: i32,
    /// Catch the product was entered with, if any.
    pub catch_id: Option<i32>,
    /// Fish species, for example `Pike`.
    pub species: String,
    /// Preparation form.
    pub form: FishForm,
    /// Price per kilogram in cents.
    pub price_cents: i32,
    /// Quantity still available for ordering, in grams.
    pub available_grams: i32,
    /// Day the fish was caught.
    pub caught_on: NaiveDate,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Whether any quantity is left to order.
    pub fn in_stock(&self) -> bool {
        self.available_grams > 0
    }
}

/// Patch data applied when updating an existing product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProduct {
    /// Optional price update.
    pub price_cents: Option<i32>,
    /// Optional stock update.
    pub available_grams: Option<i32>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            price_cents: None,
            available_grams: None,
            updated_at: now,
        }
    }

    /// Update the price per kilogram.
    pub fn price_cents(mut self, price_cents: i32) -> Self {
        self.price_cents = Some(price_cents);
        self
    }

    /// Overwrite the available quantity.
    pub fn available_grams(mut self, available_grams: i32) -> Self {
        self.available_grams = Some(available_grams);
        self
    }
}

/// Query definition used to list products for a hub.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional species search term.
    pub search: Option<String>,
    /// Optional fisherman filter.
    pub fisherman_id: Option<i32>,
    /// Whether products without remaining stock should be listed.
    pub include_sold_out: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets in-stock products belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            fisherman_id: None,
            include_sold_out: false,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the species.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Only list products caught by `fisherman_id`.
    pub fn fisherman_id(mut self, fisherman_id: i32) -> Self {
        self.fisherman_id = Some(fisherman_id);
        self
    }

    /// Include sold-out products in the results.
    pub fn include_sold_out(mut self) -> Self {
        self.include_sold_out = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
