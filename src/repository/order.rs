use std::collections::HashMap;

use diesel::prelude::*;
use diesel::result::Error as DieselError;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::{
        order::{
            NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery, OrderStatus,
            PlacementOutcome, SoldOutItem,
        },
        pricing::{OrderTotals, line_total_cents},
    },
    models::{
        order::{
            NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
            OrderItem as DbOrderItem,
        },
        product::Product as DbProduct,
    },
    repository::{DieselRepository, OrderReader, OrderWriter},
};

fn load_items(order_id: i32, conn: &mut SqliteConnection) -> QueryResult<Vec<DbOrderItem>> {
    use crate::schema::order_items;

    order_items::table
        .filter(order_items::order_id.eq(order_id))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)
}

fn to_cents(value: i64) -> Result<i32, DieselError> {
    i32::try_from(value).map_err(|err| DieselError::SerializationError(Box::new(err)))
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::hub_id.eq(hub_id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = load_items(order.id, &mut conn)?;

        Ok(Some(DomainOrder::from((order, items))))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let OrderListQuery {
            hub_id,
            status,
            customer_id,
            search,
            pagination,
        } = query;

        let status_filter: Option<&'static str> = status.map(Into::into);
        let search_pattern = search.as_ref().map(|term| format!("%{}%", term));

        let mut count_query = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status_value) = status_filter {
            count_query = count_query.filter(orders::status.eq(status_value));
        }

        if let Some(customer) = customer_id {
            count_query = count_query.filter(orders::customer_id.eq(customer));
        }

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(
                orders::contact_name
                    .like(pattern.clone())
                    .or(orders::contact_email.like(pattern.clone()))
                    .or(orders::contact_phone.like(pattern.clone())),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status_value) = status_filter {
            items = items.filter(orders::status.eq(status_value));
        }

        if let Some(customer) = customer_id {
            items = items.filter(orders::customer_id.eq(customer));
        }

        if let Some(ref pattern) = search_pattern {
            items = items.filter(
                orders::contact_name
                    .like(pattern.clone())
                    .or(orders::contact_email.like(pattern.clone()))
                    .or(orders::contact_phone.like(pattern.clone())),
            );
        }

        items = items.order((orders::created_at.desc(), orders::id.desc()));

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;
        if db_orders.is_empty() {
            return Ok((total, Vec::new()));
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();

        let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();

        let rows = order_items::table
            .filter(order_items::order_id.eq_any(&order_ids))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        for item in rows {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let order_items = items_by_order.remove(&order.id).unwrap_or_default();
                DomainOrder::from((order, order_items))
            })
            .collect();

        Ok((total, orders))
    }
}

impl OrderWriter for DieselRepository {
    fn place_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<PlacementOutcome> {
        use crate::schema::{order_items, orders, products};

        let mut conn = self.conn()?;
        let mut sold_out: Vec<SoldOutItem> = Vec::new();

        // The writer lock is taken at BEGIN so the stock read below can never
        // be invalidated by a concurrent placement.
        let result = conn.immediate_transaction::<DomainOrder, DieselError, _>(|conn| {
            let now = chrono::Local::now().naive_utc();
            let mut reserved: Vec<DbProduct> = Vec::with_capacity(new_order.lines.len());
            let mut quantities: Vec<i32> = Vec::with_capacity(new_order.lines.len());

            for line in &new_order.lines {
                if line.quantity_grams <= 0 {
                    continue;
                }

                let product = products::table
                    .filter(products::id.eq(line.product_id))
                    .filter(products::hub_id.eq(new_order.hub_id))
                    .first::<DbProduct>(conn)
                    .optional()?;

                let Some(product) = product else {
                    sold_out.push(SoldOutItem {
                        product_id: line.product_id,
                        species: String::new(),
                        form: None,
                        requested_grams: line.quantity_grams,
                        available_grams: 0,
                    });
                    continue;
                };

                // The stock check and the decrement are a single statement so
                // two placements can never both take the last grams.
                let updated = diesel::update(
                    products::table
                        .filter(products::id.eq(product.id))
                        .filter(products::available_grams.ge(line.quantity_grams)),
                )
                .set((
                    products::available_grams.eq(products::available_grams - line.quantity_grams),
                    products::updated_at.eq(now),
                ))
                .execute(conn)?;

                if updated == 0 {
                    sold_out.push(SoldOutItem {
                        product_id: product.id,
                        species: product.species.clone(),
                        form: Some(product.form.as_str().into()),
                        requested_grams: line.quantity_grams,
                        available_grams: product.available_grams.max(0),
                    });
                    continue;
                }

                quantities.push(line.quantity_grams);
                reserved.push(product);
            }

            if !sold_out.is_empty() || reserved.is_empty() {
                return Err(DieselError::RollbackTransaction);
            }

            let totals = OrderTotals::compute(
                reserved
                    .iter()
                    .zip(&quantities)
                    .map(|(product, grams)| (product.price_cents, *grams)),
                Some(new_order.fulfillment_type),
                new_order.delivery_fee_cents,
            );

            let db_new = DbNewOrder::from_domain(
                new_order,
                to_cents(totals.subtotal_cents)?,
                to_cents(totals.delivery_fee_cents)?,
                to_cents(totals.total_cents)?,
            );

            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            let line_totals = reserved
                .iter()
                .zip(&quantities)
                .map(|(product, grams)| to_cents(line_total_cents(product.price_cents, *grams)))
                .collect::<Result<Vec<i32>, DieselError>>()?;

            let payload: Vec<DbNewOrderItem> = reserved
                .iter()
                .zip(quantities.iter().zip(line_totals))
                .map(|(product, (grams, line_total))| DbNewOrderItem {
                    order_id: created.id,
                    product_id: Some(product.id),
                    species: product.species.as_str(),
                    form: product.form.as_str(),
                    price_cents: product.price_cents,
                    quantity_grams: *grams,
                    line_total_cents: line_total,
                })
                .collect();

            diesel::insert_into(order_items::table)
                .values(&payload)
                .execute(conn)?;

            let items = load_items(created.id, conn)?;

            Ok(DomainOrder::from((created, items)))
        });

        match result {
            Ok(order) => Ok(PlacementOutcome::Placed(order)),
            Err(DieselError::RollbackTransaction) if !sold_out.is_empty() => {
                Ok(PlacementOutcome::SoldOut(sold_out))
            }
            Err(DieselError::RollbackTransaction) => Ok(PlacementOutcome::SoldOut(Vec::new())),
            Err(err) => Err(RepositoryError::from(err)),
        }
    }

    fn transition_order(
        &self,
        order_id: i32,
        hub_id: i32,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::{orders, products};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<Option<DomainOrder>, RepositoryError, _>(|conn| {
            let now = chrono::Local::now().naive_utc();
            let from_value: &'static str = from.into();
            let to_value: &'static str = to.into();

            let exists = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::hub_id.eq(hub_id))
                .select(orders::id)
                .first::<i32>(conn)
                .optional()?;

            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            let updated = diesel::update(
                orders::table
                    .filter(orders::id.eq(order_id))
                    .filter(orders::hub_id.eq(hub_id))
                    .filter(orders::status.eq(from_value)),
            )
            .set((orders::status.eq(to_value), orders::updated_at.eq(now)))
            .execute(conn)?;

            if updated == 0 {
                return Ok(None);
            }

            let items = load_items(order_id, conn)?;

            if to == OrderStatus::Cancelled {
                for item in &items {
                    let Some(product_id) = item.product_id else {
                        continue;
                    };

                    diesel::update(products::table.filter(products::id.eq(product_id)))
                        .set((
                            products::available_grams
                                .eq(products::available_grams + item.quantity_grams),
                            products::updated_at.eq(now),
                        ))
                        .execute(conn)?;
                }
            }

            let order = orders::table
                .filter(orders::id.eq(order_id))
                .first::<DbOrder>(conn)?;

            Ok(Some(DomainOrder::from((order, items))))
        })
    }
}
