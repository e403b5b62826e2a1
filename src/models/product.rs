use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::catch::{Catch as DomainCatch, NewCatchLine as DomainNewCatchLine};
use crate::domain::product::{Product as DomainProduct, UpdateProduct as DomainUpdateProduct};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub catch_id: Option<i32>,
    pub species: String,
    pub form: String,
    pub price_cents: i32,
    pub available_grams: i32,
    pub caught_on: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub catch_id: Option<i32>,
    pub species: &'a str,
    pub form: &'a str,
    pub price_cents: i32,
    pub available_grams: i32,
    pub caught_on: NaiveDate,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct {
    pub price_cents: Option<i32>,
    pub available_grams: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::catches)]
pub struct Catch {
    pub id: i32,
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub caught_on: NaiveDate,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::catches)]
pub struct NewCatch<'a> {
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub caught_on: NaiveDate,
    pub notes: Option<&'a str>,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            fisherman_id: value.fisherman_id,
            catch_id: value.catch_id,
            species: value.species,
            form: value.form.as_str().into(),
            price_cents: value.price_cents,
            available_grams: value.available_grams,
            caught_on: value.caught_on,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&DomainUpdateProduct> for UpdateProduct {
    fn from(value: &DomainUpdateProduct) -> Self {
        Self {
            price_cents: value.price_cents,
            available_grams: value.available_grams,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewProduct<'a> {
    /// Row for a product line recorded as part of catch `catch`.
    pub fn from_catch_line(catch: &Catch, line: &'a DomainNewCatchLine) -> Self {
        Self {
            hub_id: catch.hub_id,
            fisherman_id: catch.fisherman_id,
            catch_id: Some(catch.id),
            species: line.species.as_str(),
            form: line.form.into(),
            price_cents: line.price_cents,
            available_grams: line.quantity_grams,
            caught_on: catch.caught_on,
        }
    }
}

impl Catch {
    pub fn into_domain(self, products: Vec<Product>) -> DomainCatch {
        DomainCatch {
            id: self.id,
            hub_id: self.hub_id,
            fisherman_id: self.fisherman_id,
            caught_on: self.caught_on,
            notes: self.notes,
            products: products.into_iter().map(Into::into).collect(),
            created_at: self.created_at,
        }
    }
}
