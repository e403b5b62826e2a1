use diesel::prelude::*;
use diesel::upsert::excluded;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::default_price::{
        DefaultPrice as DomainDefaultPrice, UpsertDefaultPrice as DomainUpsertDefaultPrice,
    },
    models::default_price::{DefaultPrice as DbDefaultPrice, NewDefaultPrice as DbNewDefaultPrice},
    repository::{DefaultPriceReader, DefaultPriceWriter, DieselRepository},
};

impl DefaultPriceReader for DieselRepository {
    fn list_default_prices(
        &self,
        hub_id: i32,
        fisherman_id: Option<i32>,
    ) -> RepositoryResult<Vec<DomainDefaultPrice>> {
        use crate::schema::default_prices;

        let mut conn = self.conn()?;

        let mut items = default_prices::table
            .filter(default_prices::hub_id.eq(hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(fisherman_id) = fisherman_id {
            items = items.filter(default_prices::fisherman_id.eq(fisherman_id));
        }

        let rows = items
            .order((default_prices::species.asc(), default_prices::form.asc()))
            .load::<DbDefaultPrice>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl DefaultPriceWriter for DieselRepository {
    fn upsert_default_prices(
        &self,
        prices: &[DomainUpsertDefaultPrice],
    ) -> RepositoryResult<usize> {
        use crate::schema::default_prices;

        if prices.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut affected = 0;

            for price in prices {
                let row = DbNewDefaultPrice::from(price);
                affected += diesel::insert_into(default_prices::table)
                    .values(&row)
                    .on_conflict((
                        default_prices::fisherman_id,
                        default_prices::species,
                        default_prices::form,
                    ))
                    .do_update()
                    .set((
                        default_prices::price_cents.eq(excluded(default_prices::price_cents)),
                        default_prices::updated_at.eq(excluded(default_prices::updated_at)),
                    ))
                    .execute(conn)?;
            }

            Ok(affected)
        })
    }

    fn delete_default_price(&self, price_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::default_prices;

        let mut conn = self.conn()?;

        let target = default_prices::table
            .filter(default_prices::id.eq(price_id))
            .filter(default_prices::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
