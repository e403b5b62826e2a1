use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::forms::profile::CustomerProfileForm;
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::ServiceError;
use crate::services::profile::{load_customer_profile, update_customer_profile};

#[get("/profile")]
pub async fn show_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_customer_profile(repo.get_ref(), &user, storefront.hub_id) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "profile",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("profile", &data.user);
            context.insert("orders", &data.orders);
            render_template(&tera, "profile/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/profile")]
pub async fn save_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storefront: web::Data<StorefrontConfig>,
    form: web::Form<CustomerProfileForm>,
) -> impl Responder {
    match update_customer_profile(repo.get_ref(), &user, storefront.hub_id, form.into_inner()) {
        Ok(_) => {
            FlashMessage::success("Профиль сохранён.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to update profile: {err}");
            FlashMessage::error("Не удалось сохранить профиль.").send();
        }
    }
    redirect("/profile")
}
