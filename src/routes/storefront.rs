use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::domain::slot::local_now;
use crate::forms::subscriptions::{SubscribeForm, UnsubscribeForm};
use crate::repository::DieselRepository;
use crate::routes::{page_context, session_cart};
use crate::services::ServiceError;
use crate::services::storefront::{
    StorefrontQuery, load_storefront, subscribe_email, unsubscribe_email,
};

const LEGAL_PAGES: [&str; 2] = ["privacy", "terms"];

#[get("/")]
#[allow(clippy::too_many_arguments)]
pub async fn show_storefront(
    params: web::Query<StorefrontQuery>,
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let now = local_now();

    match load_storefront(repo.get_ref(), storefront.hub_id, params.0, now) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                user.as_ref(),
                "storefront",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("products", &data.products);
            context.insert("search", &data.search);
            context.insert("fishermen", &data.fishermen);
            context.insert("trips", &data.trips);
            context.insert("slots", &data.slots);
            context.insert("cart_count", &session_cart(&session).items.len());
            render_template(&tera, "storefront/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load storefront: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/subscribe")]
pub async fn subscribe(
    repo: web::Data<DieselRepository>,
    storefront: web::Data<StorefrontConfig>,
    web::Form(form): web::Form<SubscribeForm>,
) -> impl Responder {
    match subscribe_email(repo.get_ref(), storefront.hub_id, form) {
        Ok(subscription) => {
            FlashMessage::success(format!(
                "Адрес {} подписан на новости улова.",
                subscription.email
            ))
            .send();
        }
        Err(ServiceError::Form(_)) => {
            FlashMessage::error("Укажите корректный адрес электронной почты.").send();
        }
        Err(err) => {
            log::error!("Failed to subscribe email: {err}");
            FlashMessage::error("Не удалось оформить подписку.").send();
        }
    }
    redirect("/")
}

/// Landing page of the link in broadcast emails. Only the POST below
/// removes the subscription.
#[get("/unsubscribe")]
pub async fn show_unsubscribe(
    params: web::Query<UnsubscribeForm>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = page_context(
        &flash_messages,
        user.as_ref(),
        "unsubscribe",
        &server_config.auth_service_url,
        &storefront,
    );
    context.insert("token", &params.token);
    render_template(&tera, "storefront/unsubscribe.html", &context)
}

#[post("/unsubscribe")]
pub async fn unsubscribe(
    repo: web::Data<DieselRepository>,
    storefront: web::Data<StorefrontConfig>,
    web::Form(form): web::Form<UnsubscribeForm>,
) -> impl Responder {
    match unsubscribe_email(repo.get_ref(), storefront.hub_id, &form.token) {
        Ok(()) => {
            FlashMessage::success("Вы отписались от рассылки.").send();
        }
        Err(ServiceError::Form(_)) => {
            FlashMessage::error("Ссылка для отписки недействительна.").send();
        }
        Err(err) => {
            log::error!("Failed to unsubscribe email: {err}");
            FlashMessage::error("Не удалось отменить подписку.").send();
        }
    }
    redirect("/")
}

#[get("/legal/{page}")]
pub async fn show_legal(
    path: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = path.into_inner();
    let context = page_context(
        &flash_messages,
        user.as_ref(),
        "legal",
        &server_config.auth_service_url,
        &storefront,
    );

    if !LEGAL_PAGES.contains(&page.as_str()) {
        let mut response = render_template(&tera, "errors/404.html", &context);
        *response.status_mut() = StatusCode::NOT_FOUND;
        return response;
    }

    render_template(&tera, &format!("legal/{page}.html"), &context)
}
