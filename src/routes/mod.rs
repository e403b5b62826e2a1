use actix_session::Session;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::{base_context, check_role};
use serde::Serialize;
use tera::Context;

use crate::SERVICE_ACCESS_ROLE;
use crate::config::StorefrontConfig;
use crate::domain::cart::{CART_SESSION_KEY, Cart};
use crate::domain::order::SoldOutItem;
use crate::services::views::describe_sold_out;

pub mod api;
pub mod cart;
pub mod catches;
pub mod checkout;
pub mod fisherman;
pub mod orders;
pub mod prices;
pub mod profile;
pub mod slots;
pub mod storefront;
pub mod subscribers;
pub mod trips;

#[derive(Serialize)]
struct Alert {
    level: &'static str,
    message: String,
}

fn alert_class(level: Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Template context shared by every page. Public pages are rendered for
/// anonymous visitors too, so the user is optional.
pub(crate) fn page_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
    home_url: &str,
    storefront: &StorefrontConfig,
) -> Context {
    let mut context = match user {
        Some(user) => base_context(flash_messages, user, current_page, home_url),
        None => Context::new(),
    };

    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_class(message.level()),
            message: message.content().to_string(),
        })
        .collect();

    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context.insert("currency", &storefront.currency);
    context.insert(
        "is_fisherman",
        &user.is_some_and(|user| check_role(SERVICE_ACCESS_ROLE, &user.roles)),
    );
    context
}

/// Cart stored in the session; an unreadable cookie yields an empty cart.
pub(crate) fn session_cart(session: &Session) -> Cart {
    match session.get::<Cart>(CART_SESSION_KEY) {
        Ok(cart) => cart.unwrap_or_default(),
        Err(err) => {
            log::warn!("Failed to read cart from session: {err}");
            Cart::default()
        }
    }
}

pub(crate) fn store_cart(session: &Session, cart: &Cart) -> bool {
    match session.insert(CART_SESSION_KEY, cart) {
        Ok(()) => true,
        Err(err) => {
            log::error!("Failed to store cart in session: {err}");
            FlashMessage::error("Не удалось сохранить корзину.").send();
            false
        }
    }
}

/// Flash `header` followed by one message per sold-out line.
pub(crate) fn flash_sold_out(header: &str, items: &[SoldOutItem]) {
    FlashMessage::warning(header.to_string()).send();
    for item in items {
        FlashMessage::warning(describe_sold_out(item)).send();
    }
}
