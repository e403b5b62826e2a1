use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::catch::{Catch as DomainCatch, NewCatch as DomainNewCatch},
    models::product::{
        Catch as DbCatch, NewCatch as DbNewCatch, NewProduct as DbNewProduct, Product as DbProduct,
    },
    repository::{CatchReader, CatchWriter, DieselRepository},
};

impl CatchReader for DieselRepository {
    fn get_catch_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainCatch>> {
        use crate::schema::{catches, products};

        let mut conn = self.conn()?;
        let catch = catches::table
            .filter(catches::id.eq(id))
            .filter(catches::hub_id.eq(hub_id))
            .first::<DbCatch>(&mut conn)
            .optional()?;

        let Some(catch) = catch else {
            return Ok(None);
        };

        let products = products::table
            .filter(products::catch_id.eq(catch.id))
            .order(products::id.asc())
            .load::<DbProduct>(&mut conn)?;

        Ok(Some(catch.into_domain(products)))
    }
}

impl CatchWriter for DieselRepository {
    fn create_catch(&self, new_catch: &DomainNewCatch) -> RepositoryResult<DomainCatch> {
        use crate::schema::{catches, products};

        let mut conn = self.conn()?;

        conn.transaction::<DomainCatch, RepositoryError, _>(|conn| {
            let db_new = DbNewCatch {
                hub_id: new_catch.hub_id,
                fisherman_id: new_catch.fisherman_id,
                caught_on: new_catch.caught_on,
                notes: new_catch.notes.as_deref(),
            };

            let created = diesel::insert_into(catches::table)
                .values(&db_new)
                .get_result::<DbCatch>(conn)?;

            if !new_catch.lines.is_empty() {
                let payload: Vec<DbNewProduct> = new_catch
                    .lines
                    .iter()
                    .map(|line| DbNewProduct::from_catch_line(&created, line))
                    .collect();

                diesel::insert_into(products::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            let products = products::table
                .filter(products::catch_id.eq(created.id))
                .order(products::id.asc())
                .load::<DbProduct>(conn)?;

            Ok(created.into_domain(products))
        })
    }

    fn delete_catch(&self, catch_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::{catches, order_items, products};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let target = catches::table
                .filter(catches::id.eq(catch_id))
                .filter(catches::hub_id.eq(hub_id));

            let exists = target.select(catches::id).first::<i32>(conn).optional()?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            let product_ids = products::table
                .filter(products::catch_id.eq(catch_id))
                .select(products::id)
                .load::<i32>(conn)?;

            if !product_ids.is_empty() {
                diesel::update(
                    order_items::table.filter(order_items::product_id.eq_any(&product_ids)),
                )
                .set(order_items::product_id.eq(None::<i32>))
                .execute(conn)?;

                diesel::delete(products::table.filter(products::id.eq_any(&product_ids)))
                    .execute(conn)?;
            }

            diesel::delete(target).execute(conn)?;

            Ok(())
        })
    }
}
