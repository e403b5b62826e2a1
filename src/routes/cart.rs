use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::forms::cart::{AddToCartForm, RemoveFromCartForm, UpdateCartForm};
use crate::repository::DieselRepository;
use crate::routes::{flash_sold_out, page_context, session_cart, store_cart};
use crate::services::ServiceError;
use crate::services::cart::{add_to_cart, load_cart, remove_from_cart, update_cart};

#[get("/cart")]
pub async fn show_cart(
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let cart = session_cart(&session);

    match load_cart(repo.get_ref(), storefront.hub_id, &cart, None, 0) {
        Ok(view) => {
            let mut context = page_context(
                &flash_messages,
                user.as_ref(),
                "cart",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("cart", &view);
            render_template(&tera, "cart/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load cart: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/cart/add")]
pub async fn add_cart_item(
    session: Session,
    repo: web::Data<DieselRepository>,
    storefront: web::Data<StorefrontConfig>,
    web::Form(form): web::Form<AddToCartForm>,
) -> impl Responder {
    let mut cart = session_cart(&session);

    match add_to_cart(repo.get_ref(), storefront.hub_id, &mut cart, form) {
        Ok(product) => {
            if store_cart(&session, &cart) {
                FlashMessage::success(format!("{} добавлен в корзину.", product.species)).send();
            }
        }
        Err(ServiceError::SoldOut(items)) => {
            flash_sold_out("Столько товара нет в наличии:", &items);
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар не найден.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to add item to cart: {err}");
            FlashMessage::error("Не удалось добавить товар в корзину.").send();
        }
    }
    redirect("/")
}

/// Quantities are posted as repeated `product_id`/`quantity_kg` pairs.
#[post("/cart/update")]
pub async fn update_cart_items(
    session: Session,
    repo: web::Data<DieselRepository>,
    storefront: web::Data<StorefrontConfig>,
    body: web::Bytes,
) -> impl Responder {
    let form: UpdateCartForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Failed to parse cart update: {err}");
            FlashMessage::error("Некорректные данные корзины.").send();
            return redirect("/cart");
        }
    };

    let mut cart = session_cart(&session);

    match update_cart(repo.get_ref(), storefront.hub_id, &mut cart, form) {
        Ok(()) => {
            if store_cart(&session, &cart) {
                FlashMessage::success("Корзина обновлена.").send();
            }
        }
        Err(ServiceError::SoldOut(items)) => {
            flash_sold_out("Корзина не изменена, столько товара нет в наличии:", &items);
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to update cart: {err}");
            FlashMessage::error("Не удалось обновить корзину.").send();
        }
    }
    redirect("/cart")
}

#[post("/cart/remove")]
pub async fn remove_cart_item(
    session: Session,
    web::Form(form): web::Form<RemoveFromCartForm>,
) -> impl Responder {
    let mut cart = session_cart(&session);

    match remove_from_cart(&mut cart, form.product_id) {
        Ok(()) => {
            if store_cart(&session, &cart) {
                FlashMessage::success("Товар удалён из корзины.").send();
            }
        }
        Err(_) => {
            FlashMessage::warning("Товара уже нет в корзине.").send();
        }
    }
    redirect("/cart")
}
