use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::config::StorefrontConfig;
use crate::forms::subscriptions::BroadcastForm;
use crate::mailer::Mailer;
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::ServiceError;
use crate::services::subscribers::{SubscribersQuery, broadcast, load_subscribers};

#[get("/admin/subscribers")]
pub async fn show_subscribers(
    params: web::Query<SubscribersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    storefront: web::Data<StorefrontConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_subscribers(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                "subscribers",
                &server_config.auth_service_url,
                &storefront,
            );
            context.insert("subscriptions", &data.subscriptions);
            context.insert("total", &data.total);
            render_template(&tera, "admin/subscribers.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list subscribers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/subscribers/broadcast")]
pub async fn send_broadcast(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    mailer: web::Data<dyn Mailer>,
    storefront: web::Data<StorefrontConfig>,
    form: web::Form<BroadcastForm>,
) -> impl Responder {
    match broadcast(
        repo.get_ref(),
        mailer.get_ref(),
        &user,
        form.into_inner(),
        &storefront.public_url,
    ) {
        Ok(sent) => {
            FlashMessage::success(format!("Рассылка отправлена подписчикам: {sent}.")).send();
            redirect("/admin/subscribers")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/subscribers")
        }
        Err(err) => {
            log::error!("Failed to send broadcast: {err}");
            FlashMessage::error("Не удалось отправить рассылку.").send();
            redirect("/admin/subscribers")
        }
    }
}
