use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::config::StorefrontConfig;
use crate::domain::slot::local_now;
use crate::forms::checkout::ApiOrderRequest;
use crate::mailer::Mailer;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::checkout::place_order;
use crate::services::storefront::list_available_products;
use crate::services::views::OrderView;

#[get("/v1/products")]
/// Return the products currently in stock as JSON.
pub async fn api_v1_products(
    repo: web::Data<DieselRepository>,
    storefront: web::Data<StorefrontConfig>,
) -> impl Responder {
    match list_available_products(repo.get_ref(), storefront.hub_id) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/orders")]
/// Place an order for the authenticated customer.
///
/// Responds with `201 Created` and the order, `409 Conflict` listing the
/// sold-out lines when stock ran short, or `400 Bad Request` for an invalid
/// payload.
pub async fn api_v1_place_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    mailer: web::Data<dyn Mailer>,
    storefront: web::Data<StorefrontConfig>,
    web::Json(request): web::Json<ApiOrderRequest>,
) -> impl Responder {
    let (cart, form) = request.into_parts();
    let now = local_now();

    match place_order(
        repo.get_ref(),
        mailer.get_ref(),
        &user,
        storefront.hub_id,
        &cart,
        form,
        now,
        &storefront.currency,
    ) {
        Ok(order) => HttpResponse::Created().json(OrderView::from(order)),
        Err(ServiceError::SoldOut(items)) => {
            HttpResponse::Conflict().json(json!({ "error": "sold_out", "items": items }))
        }
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(json!({ "error": "slot_not_found" }))
        }
        Err(err) => {
            log::error!("Failed to place order via API: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
