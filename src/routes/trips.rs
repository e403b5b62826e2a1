use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::domain::slot::local_now;
use crate::forms::trips::{AddTripForm, DeleteTripForm};
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::ServiceError;
use crate::services::trips::{add_trip, delete_trip, load_trips};

#[get("/admin/trips")]
pub async fn show_trips(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let today = local_now().date();

    match load_trips(repo.get_ref(), &user, today) {
        Ok(trips) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "trips",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("trips", &trips);
            context.insert("today", &today);
            render_template(&tera, "admin/trips.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list trips: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/trips")]
pub async fn create_trip(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddTripForm>,
) -> impl Responder {
    let today = local_now().date();

    match add_trip(repo.get_ref(), &user, form.into_inner(), today) {
        Ok(trip) => {
            FlashMessage::success(format!(
                "Выход на {} запланирован.",
                trip.trip_date.format("%d.%m.%Y")
            ))
            .send();
            redirect("/admin/trips")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/trips")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("На эту дату выход уже запланирован.").send();
            redirect("/admin/trips")
        }
        Err(err) => {
            log::error!("Failed to plan trip: {err}");
            FlashMessage::error("Не удалось запланировать выход.").send();
            redirect("/admin/trips")
        }
    }
}

#[post("/admin/trips/delete")]
pub async fn remove_trip(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<DeleteTripForm>,
) -> impl Responder {
    let trip_id = form.trip_id;

    match delete_trip(repo.get_ref(), &user, trip_id) {
        Ok(()) => {
            FlashMessage::success("Выход удалён.").send();
            redirect("/admin/trips")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Выход не найден или уже удалён.").send();
            redirect("/admin/trips")
        }
        Err(err) => {
            log::error!("Failed to delete trip {trip_id}: {err}");
            FlashMessage::error("Не удалось удалить выход.").send();
            redirect("/admin/trips")
        }
    }
}
