use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::forms::profile::FishermanProfileForm;
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::ServiceError;
use crate::services::profile::{load_fisherman_profile, save_fisherman_profile};

#[get("/admin/profile")]
pub async fn show_fisherman_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_fisherman_profile(repo.get_ref(), &user) {
        Ok(profile) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "admin_profile",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("profile", &profile);
            render_template(&tera, "admin/profile.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load fisherman profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/profile")]
pub async fn update_fisherman_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<FishermanProfileForm>,
) -> impl Responder {
    match save_fisherman_profile(repo.get_ref(), &user, form.into_inner()) {
        Ok(_) => {
            FlashMessage::success("Профиль магазина сохранён.").send();
            redirect("/admin/profile")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/profile")
        }
        Err(err) => {
            log::error!("Failed to save fisherman profile: {err}");
            FlashMessage::error("Не удалось сохранить профиль магазина.").send();
            redirect("/admin/profile")
        }
    }
}
