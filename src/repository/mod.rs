use diesel::connection::SimpleConnection;
use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::{
    catch::{Catch, NewCatch},
    default_price::{DefaultPrice, UpsertDefaultPrice},
    fisherman_profile::{FishermanCard, FishermanProfile, UpsertFishermanProfile},
    order::{NewOrder, Order, OrderListQuery, OrderStatus, PlacementOutcome},
    planned_trip::{NewPlannedTrip, PlannedTrip, PlannedTripListQuery},
    product::{Product, ProductListQuery, UpdateProduct},
    slot::{FulfillmentSlot, NewFulfillmentSlot, SlotListQuery},
    subscription::{EmailSubscription, NewEmailSubscription, SubscriptionListQuery},
    user::{NewUser, UpdateUser, User, UserListQuery},
};

pub mod catch;
pub mod default_price;
pub mod fisherman_profile;
pub mod order;
pub mod planned_trip;
pub mod product;
pub mod slot;
pub mod subscription;
pub mod user;

#[cfg(test)]
pub mod mock;

const BUSY_TIMEOUT_PRAGMA: &str = "PRAGMA busy_timeout = 5000;";

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Checked-out connections wait for a competing writer instead of
    /// failing with `SQLITE_BUSY`.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        let mut conn = self.pool.get()?;
        conn.batch_execute(BUSY_TIMEOUT_PRAGMA)?;
        Ok(conn)
    }
}

/// Read-only operations over local user records.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over local user records.
pub trait UserWriter {
    /// Insert the user or refresh the role of the existing `(hub_id, email)` row.
    /// Name, phone and avatar edited on the profile page are kept.
    fn upsert_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, user_id: i32, hub_id: i32, updates: &UpdateUser)
    -> RepositoryResult<User>;
}

pub trait FishermanProfileReader {
    fn get_profile_by_user(
        &self,
        user_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<FishermanProfile>>;
    /// Profiles joined with the owner's name. `displayed_only` hides profiles
    /// switched off for the storefront.
    fn list_fisherman_cards(
        &self,
        hub_id: i32,
        displayed_only: bool,
    ) -> RepositoryResult<Vec<FishermanCard>>;
}

pub trait FishermanProfileWriter {
    fn upsert_profile(&self, profile: &UpsertFishermanProfile)
    -> RepositoryResult<FishermanProfile>;
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
    /// Products of `hub_id` among `ids`; unknown ids are silently skipped.
    fn get_products_by_ids(&self, ids: &[i32], hub_id: i32) -> RepositoryResult<Vec<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn update_product(
        &self,
        product_id: i32,
        hub_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait CatchReader {
    fn get_catch_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Catch>>;
}

pub trait CatchWriter {
    /// Store the catch and one product per line in a single transaction.
    fn create_catch(&self, new_catch: &NewCatch) -> RepositoryResult<Catch>;
    /// Delete the catch together with all of its products.
    fn delete_catch(&self, catch_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait SlotReader {
    fn get_slot_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<FulfillmentSlot>>;
    fn list_slots(&self, query: SlotListQuery) -> RepositoryResult<Vec<FulfillmentSlot>>;
}

pub trait SlotWriter {
    fn create_slot(&self, new_slot: &NewFulfillmentSlot) -> RepositoryResult<FulfillmentSlot>;
    fn delete_slot(&self, slot_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over orders.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
}

/// Write operations over orders.
pub trait OrderWriter {
    /// Reserve stock for every line and store the order in one transaction.
    ///
    /// Each line is reserved with a conditional decrement, so concurrent
    /// placements can never drive stock below zero. When any line cannot be
    /// reserved nothing is written and every failing line is reported.
    fn place_order(&self, new_order: &NewOrder) -> RepositoryResult<PlacementOutcome>;

    /// Move the order from `from` to `to` as a compare-and-set on the current
    /// status. Returns `Ok(None)` when the order is no longer in `from`.
    /// Cancelling returns the reserved stock in the same transaction.
    fn transition_order(
        &self,
        order_id: i32,
        hub_id: i32,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepositoryResult<Option<Order>>;
}

pub trait DefaultPriceReader {
    fn list_default_prices(
        &self,
        hub_id: i32,
        fisherman_id: Option<i32>,
    ) -> RepositoryResult<Vec<DefaultPrice>>;
}

pub trait DefaultPriceWriter {
    /// Insert or replace prices keyed by `(fisherman_id, species, form)`.
    fn upsert_default_prices(&self, prices: &[UpsertDefaultPrice]) -> RepositoryResult<usize>;
    fn delete_default_price(&self, price_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait PlannedTripReader {
    fn list_planned_trips(&self, query: PlannedTripListQuery)
    -> RepositoryResult<Vec<PlannedTrip>>;
}

pub trait PlannedTripWriter {
    fn create_planned_trip(&self, new_trip: &NewPlannedTrip) -> RepositoryResult<PlannedTrip>;
    fn delete_planned_trip(&self, trip_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait SubscriptionReader {
    fn list_subscriptions(
        &self,
        query: SubscriptionListQuery,
    ) -> RepositoryResult<(usize, Vec<EmailSubscription>)>;
}

pub trait SubscriptionWriter {
    /// Store the subscription; subscribing an existing address returns the
    /// stored row unchanged.
    fn subscribe(&self, subscription: &NewEmailSubscription)
    -> RepositoryResult<EmailSubscription>;
    /// Remove the subscription holding `token`.
    fn unsubscribe(&self, token: &str, hub_id: i32) -> RepositoryResult<()>;
}
