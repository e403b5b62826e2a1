use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::planned_trip::{
    NewPlannedTrip as DomainNewPlannedTrip, PlannedTrip as DomainPlannedTrip,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::planned_trips)]
pub struct PlannedTrip {
    pub id: i32,
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub trip_date: NaiveDate,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::planned_trips)]
pub struct NewPlannedTrip<'a> {
    pub hub_id: i32,
    pub fisherman_id: i32,
    pub trip_date: NaiveDate,
    pub note: Option<&'a str>,
}

impl From<PlannedTrip> for DomainPlannedTrip {
    fn from(value: PlannedTrip) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            fisherman_id: value.fisherman_id,
            trip_date: value.trip_date,
            note: value.note,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewPlannedTrip> for NewPlannedTrip<'a> {
    fn from(value: &'a DomainNewPlannedTrip) -> Self {
        Self {
            hub_id: value.hub_id,
            fisherman_id: value.fisherman_id,
            trip_date: value.trip_date,
            note: value.note.as_deref(),
        }
    }
}
