use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::forms::orders::ChangeOrderStatusForm;
use crate::mailer::Mailer;
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::ServiceError;
use crate::services::orders::{OrdersQuery, change_order_status, load_orders};
use crate::services::views::order_status_label;

#[get("/admin/orders")]
pub async fn show_orders(
    params: web::Query<OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_orders(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "orders",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("orders", &data.orders);
            context.insert("search", &data.search);
            context.insert("status", &data.status);
            context.insert("status_options", &data.status_options);
            context.insert("search_action", "/admin/orders");
            render_template(&tera, "admin/orders.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/orders/{order_id}/status")]
pub async fn update_order_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    mailer: web::Data<dyn Mailer>,
    form: web::Form<ChangeOrderStatusForm>,
) -> impl Responder {
    let order_id = path.into_inner();

    match change_order_status(
        repo.get_ref(),
        mailer.get_ref(),
        &user,
        order_id,
        form.into_inner(),
    ) {
        Ok(order) => {
            FlashMessage::success(format!(
                "Заказ №{} переведён в статус «{}».",
                order.id, order.status_label
            ))
            .send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            return redirect("/na");
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Заказ не найден.").send();
        }
        Err(ServiceError::InvalidTransition { from, to }) => {
            FlashMessage::error(format!(
                "Нельзя перевести заказ из статуса «{}» в «{}».",
                order_status_label(from),
                order_status_label(to)
            ))
            .send();
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::warning("Статус заказа уже изменился, обновите страницу.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to change status of order {order_id}: {err}");
            FlashMessage::error("Не удалось изменить статус заказа.").send();
        }
    }
    redirect("/admin/orders")
}
