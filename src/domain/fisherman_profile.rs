use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Public-facing shop details of a fisherman (one per admin user).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FishermanProfile {
    /// Unique identifier of the profile.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Admin user the profile belongs to.
    pub user_id: i32,
    /// Address where pickup orders are collected.
    pub pickup_address: Option<String>,
    /// Default delivery fee in cents applied to delivery orders.
    pub delivery_fee_cents: i32,
    /// Phone number shown to customers.
    pub public_phone: Option<String>,
    /// Short note shown on the storefront homepage.
    pub homepage_note: Option<String>,
    /// Whether the profile is shown on the storefront.
    pub is_displayed: bool,
    /// Timestamp for when the profile was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the profile.
    pub updated_at: NaiveDateTime,
}

/// Full set of editable profile fields. Saving always writes every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertFishermanProfile {
    pub hub_id: i32,
    pub user_id: i32,
    pub pickup_address: Option<String>,
    pub delivery_fee_cents: i32,
    pub public_phone: Option<String>,
    pub homepage_note: Option<String>,
    pub is_displayed: bool,
    pub updated_at: NaiveDateTime,
}

impl UpsertFishermanProfile {
    /// Start from an empty, displayed profile with no delivery fee.
    pub fn new(hub_id: i32, user_id: i32) -> Self {
        Self {
            hub_id,
            user_id,
            pickup_address: None,
            delivery_fee_cents: 0,
            public_phone: None,
            homepage_note: None,
            is_displayed: true,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}

/// Profile joined with the owning user's display name, used on the storefront.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FishermanCard {
    pub name: String,
    pub profile: FishermanProfile,
}
