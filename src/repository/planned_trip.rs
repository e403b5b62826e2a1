use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::planned_trip::{
        NewPlannedTrip as DomainNewPlannedTrip, PlannedTrip as DomainPlannedTrip,
        PlannedTripListQuery,
    },
    models::planned_trip::{NewPlannedTrip as DbNewPlannedTrip, PlannedTrip as DbPlannedTrip},
    repository::{DieselRepository, PlannedTripReader, PlannedTripWriter},
};

impl PlannedTripReader for DieselRepository {
    fn list_planned_trips(
        &self,
        query: PlannedTripListQuery,
    ) -> RepositoryResult<Vec<DomainPlannedTrip>> {
        use crate::schema::planned_trips;

        let mut conn = self.conn()?;

        let mut items = planned_trips::table
            .filter(planned_trips::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(date) = query.from {
            items = items.filter(planned_trips::trip_date.ge(date));
        }

        if let Some(fisherman_id) = query.fisherman_id {
            items = items.filter(planned_trips::fisherman_id.eq(fisherman_id));
        }

        let rows = items
            .order((planned_trips::trip_date.asc(), planned_trips::id.asc()))
            .load::<DbPlannedTrip>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl PlannedTripWriter for DieselRepository {
    fn create_planned_trip(
        &self,
        new_trip: &DomainNewPlannedTrip,
    ) -> RepositoryResult<DomainPlannedTrip> {
        use crate::schema::planned_trips;

        let mut conn = self.conn()?;
        let db_new = DbNewPlannedTrip::from(new_trip);

        let created = diesel::insert_into(planned_trips::table)
            .values(&db_new)
            .get_result::<DbPlannedTrip>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_planned_trip(&self, trip_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::planned_trips;

        let mut conn = self.conn()?;

        let target = planned_trips::table
            .filter(planned_trips::id.eq(trip_id))
            .filter(planned_trips::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
