use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::routes::{logout, not_assigned};
use tera::Tera;

use pushkind_fishmarket::config::ServerConfig;
use pushkind_fishmarket::mailer::build_mailer;
use pushkind_fishmarket::repository::DieselRepository;
use pushkind_fishmarket::routes::api::{api_v1_place_order, api_v1_products};
use pushkind_fishmarket::routes::cart::{
    add_cart_item, remove_cart_item, show_cart, update_cart_items,
};
use pushkind_fishmarket::routes::catches::{
    add_catch, delete_catch, delete_product, edit_product, show_catches,
};
use pushkind_fishmarket::routes::checkout::{show_checkout, show_thank_you, submit_checkout};
use pushkind_fishmarket::routes::fisherman::{show_fisherman_profile, update_fisherman_profile};
use pushkind_fishmarket::routes::orders::{show_orders, update_order_status};
use pushkind_fishmarket::routes::prices::{
    remove_price, show_prices, upload_price_list, upsert_price,
};
use pushkind_fishmarket::routes::profile::{save_profile, show_profile};
use pushkind_fishmarket::routes::slots::{create_slot, remove_slot, show_slots};
use pushkind_fishmarket::routes::storefront::{
    show_legal, show_storefront, show_unsubscribe, subscribe, unsubscribe,
};
use pushkind_fishmarket::routes::subscribers::{send_broadcast, show_subscribers};
use pushkind_fishmarket::routes::trips::{create_trip, remove_trip, show_trips};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = if config.secret.is_empty() {
        Key::generate()
    } else {
        Key::from(config.secret.as_bytes())
    };

    let common_config = config.common();
    let storefront_config = config.storefront.clone();
    let domain = config.domain.clone();

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let mailer = web::Data::from(build_mailer(&config.email));

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Starting storefront for hub {} on {}:{}",
        storefront_config.hub_id,
        config.address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(show_storefront)
            .service(subscribe)
            .service(show_unsubscribe)
            .service(unsubscribe)
            .service(show_legal)
            .service(show_cart)
            .service(add_cart_item)
            .service(update_cart_items)
            .service(remove_cart_item)
            .service(
                web::scope("/api")
                    .service(api_v1_products)
                    .service(api_v1_place_order),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_checkout)
                    .service(submit_checkout)
                    .service(show_thank_you)
                    .service(show_profile)
                    .service(save_profile)
                    .service(show_orders)
                    .service(update_order_status)
                    .service(show_catches)
                    .service(add_catch)
                    .service(delete_catch)
                    .service(edit_product)
                    .service(delete_product)
                    .service(show_prices)
                    .service(upsert_price)
                    .service(remove_price)
                    .service(upload_price_list)
                    .service(show_slots)
                    .service(create_slot)
                    .service(remove_slot)
                    .service(show_trips)
                    .service(create_trip)
                    .service(remove_trip)
                    .service(show_subscribers)
                    .service(send_broadcast)
                    .service(show_fisherman_profile)
                    .service(update_fisherman_profile)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(storefront_config.clone()))
            .app_data(mailer.clone())
    })
    .bind((config.address.clone(), config.port))?
    .run()
    .await
}
