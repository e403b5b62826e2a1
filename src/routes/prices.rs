use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::forms::prices::{DeleteDefaultPriceForm, UploadDefaultPricesForm, UpsertDefaultPriceForm};
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::ServiceError;
use crate::services::prices::{delete_price, load_prices, save_price, upload_prices};

#[get("/admin/prices")]
pub async fn show_prices(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_prices(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "prices",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("prices", &data.prices);
            context.insert("forms", &data.forms);
            render_template(&tera, "admin/prices.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list default prices: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/prices")]
pub async fn upsert_price(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<UpsertDefaultPriceForm>,
) -> impl Responder {
    match save_price(repo.get_ref(), &user, form.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Цена сохранена.").send();
            redirect("/admin/prices")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/prices")
        }
        Err(err) => {
            log::error!("Failed to save default price: {err}");
            FlashMessage::error("Не удалось сохранить цену.").send();
            redirect("/admin/prices")
        }
    }
}

#[post("/admin/prices/delete")]
pub async fn remove_price(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<DeleteDefaultPriceForm>,
) -> impl Responder {
    let price_id = form.price_id;

    match delete_price(repo.get_ref(), &user, price_id) {
        Ok(()) => {
            FlashMessage::success("Цена удалена.").send();
            redirect("/admin/prices")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Цена не найдена или уже удалена.").send();
            redirect("/admin/prices")
        }
        Err(err) => {
            log::error!("Failed to delete default price {price_id}: {err}");
            FlashMessage::error("Не удалось удалить цену.").send();
            redirect("/admin/prices")
        }
    }
}

#[post("/admin/prices/upload")]
pub async fn upload_price_list(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadDefaultPricesForm>,
) -> impl Responder {
    match upload_prices(repo.get_ref(), &user, form) {
        Ok(stored) => {
            FlashMessage::success(format!("Загружено цен: {stored}.")).send();
            redirect("/admin/prices")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/prices")
        }
        Err(err) => {
            log::error!("Failed to upload default prices: {err}");
            FlashMessage::error("Не удалось загрузить цены.").send();
            redirect("/admin/prices")
        }
    }
}
