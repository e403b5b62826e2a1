use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::slot::{
    FulfillmentSlot as DomainFulfillmentSlot, NewFulfillmentSlot as DomainNewFulfillmentSlot,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::fulfillment_slots)]
pub struct FulfillmentSlot {
    pub id: i32,
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub kind: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::fulfillment_slots)]
pub struct NewFulfillmentSlot<'a> {
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub kind: &'a str,
}

impl From<FulfillmentSlot> for DomainFulfillmentSlot {
    fn from(value: FulfillmentSlot) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            fisherman_id: value.fisherman_id,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            kind: value.kind.as_str().into(),
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewFulfillmentSlot> for NewFulfillmentSlot<'a> {
    fn from(value: &'a DomainNewFulfillmentSlot) -> Self {
        Self {
            hub_id: value.hub_id,
            fisherman_id: value.fisherman_id,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            kind: value.kind.into(),
        }
    }
}
