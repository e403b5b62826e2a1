use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::domain::slot::local_now;
use crate::forms::slots::{AddSlotForm, DeleteSlotForm};
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::ServiceError;
use crate::services::slots::{SlotsQuery, add_slot, delete_slot, load_slots};

#[get("/admin/slots")]
pub async fn show_slots(
    params: web::Query<SlotsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let now = local_now();

    match load_slots(repo.get_ref(), &user, params.0, now) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "slots",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("slots", &data.slots);
            context.insert("show_past", &data.show_past);
            render_template(&tera, "admin/slots.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list slots: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/slots")]
pub async fn create_slot(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddSlotForm>,
) -> impl Responder {
    let now = local_now();

    match add_slot(repo.get_ref(), &user, form.into_inner(), now) {
        Ok(slot) => {
            FlashMessage::success(format!(
                "Интервал {} добавлен.",
                slot.starts_at.format("%d.%m.%Y %H:%M")
            ))
            .send();
            redirect("/admin/slots")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/slots")
        }
        Err(err) => {
            log::error!("Failed to add slot: {err}");
            FlashMessage::error("Не удалось добавить интервал.").send();
            redirect("/admin/slots")
        }
    }
}

#[post("/admin/slots/delete")]
pub async fn remove_slot(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<DeleteSlotForm>,
) -> impl Responder {
    let slot_id = form.slot_id;

    match delete_slot(repo.get_ref(), &user, slot_id) {
        Ok(()) => {
            FlashMessage::success("Интервал удалён.").send();
            redirect("/admin/slots")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Интервал не найден или уже удалён.").send();
            redirect("/admin/slots")
        }
        Err(err) => {
            log::error!("Failed to delete slot {slot_id}: {err}");
            FlashMessage::error("Не удалось удалить интервал.").send();
            redirect("/admin/slots")
        }
    }
}
