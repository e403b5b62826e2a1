use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::domain::slot::local_now;
use crate::forms::catches::{EditProductForm, RecordCatchForm};
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::ServiceError;
use crate::services::catches::{
    CatchesQuery, load_catches, record_catch, remove_catch, remove_product, update_product,
};

#[get("/admin/catches")]
pub async fn show_catches(
    params: web::Query<CatchesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_catches(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "catches",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("products", &data.products);
            context.insert("search", &data.search);
            context.insert("search_action", "/admin/catches");
            context.insert("show_sold_out", &data.show_sold_out);
            context.insert("default_prices", &data.default_prices);
            context.insert("forms", &data.forms);
            context.insert("today", &local_now().date());
            render_template(&tera, "admin/catches.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list catches: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Catch lines are posted as `lines[0][species]=...` and need `serde_qs`.
#[post("/admin/catches")]
pub async fn add_catch(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: RecordCatchForm = match serde_qs::Config::new(5, false).deserialize_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Failed to parse catch form: {err}");
            FlashMessage::error("Некорректные данные улова.").send();
            return redirect("/admin/catches");
        }
    };

    match record_catch(repo.get_ref(), &user, form) {
        Ok(created) => {
            FlashMessage::success(format!(
                "Улов записан, позиций: {}.",
                created.products.len()
            ))
            .send();
            redirect("/admin/catches")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/catches")
        }
        Err(err) => {
            log::error!("Failed to record catch: {err}");
            FlashMessage::error("Не удалось записать улов.").send();
            redirect("/admin/catches")
        }
    }
}

#[post("/admin/catches/{catch_id}/delete")]
pub async fn delete_catch(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let catch_id = path.into_inner();

    match remove_catch(repo.get_ref(), &user, catch_id) {
        Ok(()) => {
            FlashMessage::success("Улов удалён.").send();
            redirect("/admin/catches")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Улов не найден или уже удалён.").send();
            redirect("/admin/catches")
        }
        Err(err) => {
            log::error!("Failed to delete catch {catch_id}: {err}");
            FlashMessage::error("Не удалось удалить улов.").send();
            redirect("/admin/catches")
        }
    }
}

#[post("/admin/products/edit")]
pub async fn edit_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<EditProductForm>,
) -> impl Responder {
    match update_product(repo.get_ref(), &user, form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Товар «{}» изменён.", product.species)).send();
            redirect("/admin/catches")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/catches")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар не найден.").send();
            redirect("/admin/catches")
        }
        Err(err) => {
            log::error!("Failed to modify product: {err}");
            FlashMessage::error("Не удалось изменить товар.").send();
            redirect("/admin/catches")
        }
    }
}

#[post("/admin/products/{product_id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match remove_product(repo.get_ref(), &user, product_id) {
        Ok(()) => {
            FlashMessage::success("Товар удалён.").send();
            redirect("/admin/catches")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар не найден или уже удалён.").send();
            redirect("/admin/catches")
        }
        Err(err) => {
            log::error!("Failed to delete product {product_id}: {err}");
            FlashMessage::error("Не удалось удалить товар.").send();
            redirect("/admin/catches")
        }
    }
}
