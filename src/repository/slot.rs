use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::slot::{
        FulfillmentSlot as DomainFulfillmentSlot, NewFulfillmentSlot as DomainNewFulfillmentSlot,
        SlotListQuery,
    },
    models::slot::{
        FulfillmentSlot as DbFulfillmentSlot, NewFulfillmentSlot as DbNewFulfillmentSlot,
    },
    repository::{DieselRepository, SlotReader, SlotWriter},
};

impl SlotReader for DieselRepository {
    fn get_slot_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainFulfillmentSlot>> {
        use crate::schema::fulfillment_slots;

        let mut conn = self.conn()?;
        let slot = fulfillment_slots::table
            .filter(fulfillment_slots::id.eq(id))
            .filter(fulfillment_slots::hub_id.eq(hub_id))
            .first::<DbFulfillmentSlot>(&mut conn)
            .optional()?;

        Ok(slot.map(Into::into))
    }

    fn list_slots(&self, query: SlotListQuery) -> RepositoryResult<Vec<DomainFulfillmentSlot>> {
        use crate::schema::fulfillment_slots;

        let mut conn = self.conn()?;

        let mut items = fulfillment_slots::table
            .filter(fulfillment_slots::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(moment) = query.ending_after {
            items = items.filter(fulfillment_slots::ends_at.gt(moment));
        }

        if let Some(fisherman_id) = query.fisherman_id {
            items = items.filter(fulfillment_slots::fisherman_id.eq(fisherman_id));
        }

        if let Some(kind) = query.kind {
            let kind: &'static str = kind.into();
            items = items.filter(fulfillment_slots::kind.eq(kind));
        }

        let rows = items
            .order((fulfillment_slots::starts_at.asc(), fulfillment_slots::id.asc()))
            .load::<DbFulfillmentSlot>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl SlotWriter for DieselRepository {
    fn create_slot(
        &self,
        new_slot: &DomainNewFulfillmentSlot,
    ) -> RepositoryResult<DomainFulfillmentSlot> {
        use crate::schema::fulfillment_slots;

        let mut conn = self.conn()?;
        let db_new = DbNewFulfillmentSlot::from(new_slot);

        let created = diesel::insert_into(fulfillment_slots::table)
            .values(&db_new)
            .get_result::<DbFulfillmentSlot>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_slot(&self, slot_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::{fulfillment_slots, orders};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let target = fulfillment_slots::table
                .filter(fulfillment_slots::id.eq(slot_id))
                .filter(fulfillment_slots::hub_id.eq(hub_id));

            let exists = target
                .select(fulfillment_slots::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            // Orders keep the window snapshot taken at placement.
            diesel::update(orders::table.filter(orders::slot_id.eq(slot_id)))
                .set(orders::slot_id.eq(None::<i32>))
                .execute(conn)?;

            diesel::delete(target).execute(conn)?;

            Ok(())
        })
    }
}
