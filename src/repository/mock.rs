use mockall::mock;

use super::{
    CatchReader, CatchWriter, DefaultPriceReader, DefaultPriceWriter, FishermanProfileReader,
    FishermanProfileWriter, OrderReader, OrderWriter, PlannedTripReader, PlannedTripWriter,
    ProductReader, ProductWriter, SlotReader, SlotWriter, SubscriptionReader, SubscriptionWriter,
    UserReader, UserWriter,
};
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
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    /// Mock implementing every repository trait.
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl UserWriter for Repository {
        fn upsert_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, user_id: i32, hub_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
    }

    impl FishermanProfileReader for Repository {
        fn get_profile_by_user(&self, user_id: i32, hub_id: i32) -> RepositoryResult<Option<FishermanProfile>>;
        fn list_fisherman_cards(&self, hub_id: i32, displayed_only: bool) -> RepositoryResult<Vec<FishermanCard>>;
    }

    impl FishermanProfileWriter for Repository {
        fn upsert_profile(&self, profile: &UpsertFishermanProfile) -> RepositoryResult<FishermanProfile>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
        fn get_products_by_ids(&self, ids: &[i32], hub_id: i32) -> RepositoryResult<Vec<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }

    impl ProductWriter for Repository {
        fn update_product(&self, product_id: i32, hub_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl CatchReader for Repository {
        fn get_catch_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Catch>>;
    }

    impl CatchWriter for Repository {
        fn create_catch(&self, new_catch: &NewCatch) -> RepositoryResult<Catch>;
        fn delete_catch(&self, catch_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl SlotReader for Repository {
        fn get_slot_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<FulfillmentSlot>>;
        fn list_slots(&self, query: SlotListQuery) -> RepositoryResult<Vec<FulfillmentSlot>>;
    }

    impl SlotWriter for Repository {
        fn create_slot(&self, new_slot: &NewFulfillmentSlot) -> RepositoryResult<FulfillmentSlot>;
        fn delete_slot(&self, slot_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl OrderReader for Repository {
        fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    }

    impl OrderWriter for Repository {
        fn place_order(&self, new_order: &NewOrder) -> RepositoryResult<PlacementOutcome>;
        fn transition_order(&self, order_id: i32, hub_id: i32, from: OrderStatus, to: OrderStatus) -> RepositoryResult<Option<Order>>;
    }

    impl DefaultPriceReader for Repository {
        fn list_default_prices(&self, hub_id: i32, fisherman_id: Option<i32>) -> RepositoryResult<Vec<DefaultPrice>>;
    }

    impl DefaultPriceWriter for Repository {
        fn upsert_default_prices(&self, prices: &[UpsertDefaultPrice]) -> RepositoryResult<usize>;
        fn delete_default_price(&self, price_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl PlannedTripReader for Repository {
        fn list_planned_trips(&self, query: PlannedTripListQuery) -> RepositoryResult<Vec<PlannedTrip>>;
    }

    impl PlannedTripWriter for Repository {
        fn create_planned_trip(&self, new_trip: &NewPlannedTrip) -> RepositoryResult<PlannedTrip>;
        fn delete_planned_trip(&self, trip_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl SubscriptionReader for Repository {
        fn list_subscriptions(&self, query: SubscriptionListQuery) -> RepositoryResult<(usize, Vec<EmailSubscription>)>;
    }

    impl SubscriptionWriter for Repository {
        fn subscribe(&self, subscription: &NewEmailSubscription) -> RepositoryResult<EmailSubscription>;
        fn unsubscribe(&self, token: &str, hub_id: i32) -> RepositoryResult<()>;
    }
}
