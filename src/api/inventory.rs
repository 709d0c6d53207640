use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::service::inventory::{self, BorrowRequest, CreateInventoryRequest, InventoryQuery, ReturnRequest};
use crate::store::{EmployeeStore, InventoryStore};

#[utoipa::path(
    post,
    path = "/inventory/create",
    request_body = CreateInventoryRequest,
    responses(
        (status = 201, description = "Inventory item created", body = Object, example = json!({ "id": 1 })),
        (status = 400, description = "Name or type missing"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn create_item<S: InventoryStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    payload: web::Json<CreateInventoryRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let id = inventory::create_item(store.get_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

#[utoipa::path(
    get,
    path = "/inventory",
    params(InventoryQuery),
    responses(
        (status = 200, body = crate::service::inventory::InventoryListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn list_items<S: InventoryStore + 'static>(
    _auth: AuthUser,
    store: web::Data<S>,
    query: web::Query<InventoryQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = inventory::list_items(store.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    get,
    path = "/inventory/{inventory_id}",
    params(
        ("inventory_id", Path, description = "Inventory item ID")
    ),
    responses(
        (status = 200, body = crate::model::inventory::InventoryItem),
        (status = 404, description = "Inventory item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn get_item<S: InventoryStore + 'static>(
    _auth: AuthUser,
    store: web::Data<S>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let item = inventory::get_item(store.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[utoipa::path(
    post,
    path = "/inventory/borrow",
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Item borrowed"),
        (status = 403, description = "Employees may only borrow for themselves"),
        (status = 404, description = "Item or employee not found"),
        (status = 409, description = "Inventory item is already borrowed")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn borrow_item<S: EmployeeStore + InventoryStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    payload: web::Json<BorrowRequest>,
) -> Result<HttpResponse, ApiError> {
    let now = Utc::now().naive_utc();
    inventory::borrow_item(store.get_ref(), &auth, payload.into_inner(), now).await?;
    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    post,
    path = "/inventory/return",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Item returned"),
        (status = 404, description = "Inventory item not found"),
        (status = 409, description = "Inventory item is not borrowed")
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn return_item<S: InventoryStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    payload: web::Json<ReturnRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let now = Utc::now().naive_utc();
    inventory::return_item(store.get_ref(), payload.into_inner(), now).await?;
    Ok(HttpResponse::Ok().finish())
}
