use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::orders::{CancelOrder, UpdateStatus, DEFAULT_LIMIT, DEFAULT_PAGE};

use super::AppServices;

pub fn routes() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_orders))
        .route("/admin/all", get(list_all_orders))
        .route("/:order_number", get(get_order))
        .route("/:order_number/cancel", post(cancel_order))
        .route("/:order_number/status", put(update_status))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Owner's orders, newest first, with pagination")),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub(crate) async fn list_orders(
    State(services): State<AppServices>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ServiceError> {
    let (orders, pagination) = services
        .orders
        .list_for_owner(
            auth.user_id,
            query.page.unwrap_or(DEFAULT_PAGE),
            query.limit.unwrap_or(DEFAULT_LIMIT),
        )
        .await?;

    Ok(Json(json!({ "orders": orders, "pagination": pagination })))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/admin/all",
    responses((status = 200, description = "Every order across owners, newest first")),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub(crate) async fn list_all_orders(
    State(services): State<AppServices>,
    _auth: AuthUser,
) -> Result<Json<Value>, ServiceError> {
    let orders = services.orders.list_all().await?;
    Ok(Json(json!(orders)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_number}",
    params(("order_number" = String, Path, description = "Human-readable order number")),
    responses(
        (status = 200, description = "The order"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub(crate) async fn get_order(
    State(services): State<AppServices>,
    auth: AuthUser,
    Path(order_number): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    let order = services
        .orders
        .get_for_owner(&order_number, auth.user_id)
        .await?;
    Ok(Json(json!(order)))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_number}/cancel",
    params(("order_number" = String, Path, description = "Human-readable order number")),
    request_body = CancelOrder,
    responses(
        (status = 200, description = "Order cancelled"),
        (status = 400, description = "Fulfillment already started"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub(crate) async fn cancel_order(
    State(services): State<AppServices>,
    auth: AuthUser,
    Path(order_number): Path<String>,
    body: Option<Json<CancelOrder>>,
) -> Result<Json<Value>, ServiceError> {
    let reason = body.and_then(|Json(b)| b.reason);
    let order = services
        .orders
        .cancel(auth.user_id, &order_number, reason)
        .await?;

    Ok(Json(json!({
        "message": "Order cancelled successfully",
        "order": order
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{order_number}/status",
    params(("order_number" = String, Path, description = "Human-readable order number")),
    request_body = UpdateStatus,
    responses(
        (status = 200, description = "Order after the transition"),
        (status = 400, description = "Status missing or transition refused"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub(crate) async fn update_status(
    State(services): State<AppServices>,
    _auth: AuthUser,
    Path(order_number): Path<String>,
    Json(request): Json<UpdateStatus>,
) -> Result<Json<Value>, ServiceError> {
    let order = services.orders.update_status(&order_number, request).await?;
    Ok(Json(json!(order)))
}
