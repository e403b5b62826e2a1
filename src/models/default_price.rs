use chrono::{Local, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::default_price::{
    DefaultPrice as DomainDefaultPrice, UpsertDefaultPrice as DomainUpsertDefaultPrice,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::default_prices)]
pub struct DefaultPrice {
    pub id: i32,
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub species: String,
    pub form: String,
    pub price_cents: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::default_prices)]
pub struct NewDefaultPrice<'a> {
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub species: &'a str,
    pub form: &'a str,
    pub price_cents: i32,
    pub updated_at: NaiveDateTime,
}

impl From<DefaultPrice> for DomainDefaultPrice {
    fn from(value: DefaultPrice) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            fisherman_id: value.fisherman_id,
            species: value.species,
            form: value.form.as_str().into(),
            price_cents: value.price_cents,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpsertDefaultPrice> for NewDefaultPrice<'a> {
    fn from(value: &'a DomainUpsertDefaultPrice) -> Self {
        Self {
            hub_id: value.hub_id,
            fisherman_id: value.fisherman_id,
            species: value.species.as_str(),
            form: value.form.into(),
            price_cents: value.price_cents,
            updated_at: Local::now().naive_utc(),
        }
    }
}
