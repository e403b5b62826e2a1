use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::fisherman_profile::{
    FishermanProfile as DomainFishermanProfile,
    UpsertFishermanProfile as DomainUpsertFishermanProfile,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::fisherman_profiles)]
pub struct FishermanProfile {
    pub id: i32,
    pub hub_id: i32,
    pub user_id: i32,
    pub pickup_address: Option<String>,
    pub delivery_fee_cents: i32,
    pub public_phone: Option<String>,
    pub homepage_note: Option<String>,
    pub is_displayed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::fisherman_profiles)]
#[diesel(treat_none_as_null = true)]
pub struct UpsertFishermanProfile<'a> {
    pub hub_id: i32,
    pub user_id: i32,
    pub pickup_address: Option<&'a str>,
    pub delivery_fee_cents: i32,
    pub public_phone: Option<&'a str>,
    pub homepage_note: Option<&'a str>,
    pub is_displayed: bool,
    pub updated_at: NaiveDateTime,
}

impl From<FishermanProfile> for DomainFishermanProfile {
    fn from(value: FishermanProfile) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            user_id: value.user_id,
            pickup_address: value.pickup_address,
            delivery_fee_cents: value.delivery_fee_cents,
            public_phone: value.public_phone,
            homepage_note: value.homepage_note,
            is_displayed: value.is_displayed,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpsertFishermanProfile> for UpsertFishermanProfile<'a> {
    fn from(value: &'a DomainUpsertFishermanProfile) -> Self {
        Self {
            hub_id: value.hub_id,
            user_id: value.user_id,
            pickup_address: value.pickup_address.as_deref(),
            delivery_fee_cents: value.delivery_fee_cents,
            public_phone: value.public_phone.as_deref(),
            homepage_note: value.homepage_note.as_deref(),
            is_displayed: value.is_displayed,
            updated_at: value.updated_at,
        }
    }
}
