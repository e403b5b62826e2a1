//! Helpers for integration tests.

use chrono::{NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_fishmarket::domain::catch::{Catch, NewCatch, NewCatchLine};
use pushkind_fishmarket::domain::product::FishForm;
use pushkind_fishmarket::domain::slot::{FulfillmentSlot, FulfillmentType, NewFulfillmentSlot};
use pushkind_fishmarket::domain::user::{NewUser, User, UserRole};
use pushkind_fishmarket::repository::{CatchWriter, DieselRepository, SlotWriter, UserWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn datetime(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Hub with one fisherman, one customer, a two-line catch and a pickup slot.
#[allow(dead_code)]
pub struct Market {
    pub fisherman: User,
    pub customer: User,
    pub catch: Catch,
    pub slot: FulfillmentSlot,
}

#[allow(dead_code)]
pub fn seed_market(repo: &DieselRepository, hub_id: i32) -> Market {
    let fisherman = repo
        .upsert_user(&NewUser::new(
            hub_id,
            "skipper@example.com".to_string(),
            "Skipper".to_string(),
            UserRole::Admin,
        ))
        .unwrap();
    let customer = repo
        .upsert_user(&NewUser::new(
            hub_id,
            "buyer@example.com".to_string(),
            "Buyer".to_string(),
            UserRole::Customer,
        ))
        .unwrap();

    let catch = repo
        .create_catch(
            &NewCatch::new(hub_id, fisherman.id, date("2025-05-01"))
                .with_line(NewCatchLine {
                    species: "Pike".to_string(),
                    form: FishForm::Whole,
                    price_cents: 1200,
                    quantity_grams: 2000,
                })
                .with_line(NewCatchLine {
                    species: "Perch".to_string(),
                    form: FishForm::Fillet,
                    price_cents: 2500,
                    quantity_grams: 500,
                }),
        )
        .unwrap();

    let slot = repo
        .create_slot(&NewFulfillmentSlot::new(
            hub_id,
            fisherman.id,
            datetime("2030-05-02 10:00:00"),
            datetime("2030-05-02 12:00:00"),
            FulfillmentType::Pickup,
        ))
        .unwrap();

    Market {
        fisherman,
        customer,
        catch,
        slot,
    }
}
