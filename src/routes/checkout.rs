use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::domain::slot::local_now;
use crate::forms::checkout::CheckoutForm;
use crate::mailer::Mailer;
use crate::repository::DieselRepository;
use crate::routes::{flash_sold_out, page_context, session_cart, store_cart};
use crate::services::ServiceError;
use crate::services::checkout::{CheckoutQuery, load_checkout, load_thank_you, place_order};

#[get("/checkout")]
#[allow(clippy::too_many_arguments)]
pub async fn show_checkout(
    params: web::Query<CheckoutQuery>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let cart = session_cart(&session);
    if cart.is_empty() {
        FlashMessage::info("Корзина пуста.").send();
        return redirect("/");
    }

    let now = local_now();

    match load_checkout(
        repo.get_ref(),
        &user,
        storefront.hub_id,
        &cart,
        params.slot_id,
        now,
    ) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "checkout",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("cart", &data.cart);
            context.insert("slots", &data.slots);
            context.insert("selected_slot_id", &data.selected_slot_id);
            context.insert("contact", &data.contact);
            render_template(&tera, "checkout/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load checkout: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/checkout")]
pub async fn submit_checkout(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    mailer: web::Data<dyn Mailer>,
    storefront: web::Data<StorefrontConfig>,
    web::Form(form): web::Form<CheckoutForm>,
) -> impl Responder {
    let mut cart = session_cart(&session);
    let now = local_now();

    match place_order(
        repo.get_ref(),
        mailer.get_ref(),
        &user,
        storefront.hub_id,
        &cart,
        form,
        now,
        &storefront.currency,
    ) {
        Ok(order) => {
            cart.clear();
            store_cart(&session, &cart);
            FlashMessage::success(format!("Заказ №{} оформлен.", order.id)).send();
            redirect(&format!("/orders/{}/thank-you", order.id))
        }
        Err(ServiceError::SoldOut(items)) => {
            cart.prune_sold_out(&items);
            store_cart(&session, &cart);
            flash_sold_out(
                "Часть товаров закончилась, они удалены из корзины:",
                &items,
            );
            redirect("/cart")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/checkout")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Выбранный интервал не найден.").send();
            redirect("/checkout")
        }
        Err(err) => {
            log::error!("Failed to place order: {err}");
            FlashMessage::error("Не удалось оформить заказ.").send();
            redirect("/checkout")
        }
    }
}

#[get("/orders/{order_id}/thank-you")]
pub async fn show_thank_you(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let order_id = path.into_inner();

    match load_thank_you(repo.get_ref(), &user, storefront.hub_id, order_id) {
        Ok(order) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "thank_you",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("order", &order);
            render_template(&tera, "checkout/thank_you.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Заказ не найден.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load order {order_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
