use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::checkout::{CreateCheckout, PlaceOrder};

use super::AppServices;

pub fn routes() -> Router<AppServices> {
    Router::new()
        .route("/", post(create_checkout))
        .route("/place-order", post(place_order))
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    request_body = CreateCheckout,
    responses(
        (status = 201, description = "Checkout session created from the cart"),
        (status = 400, description = "Cart ID or payment method missing"),
        (status = 404, description = "Cart or shipping address not found")
    ),
    security(("bearer_auth" = [])),
    tag = "checkout"
)]
pub(crate) async fn create_checkout(
    State(services): State<AppServices>,
    auth: AuthUser,
    Json(request): Json<CreateCheckout>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let checkout = services
        .checkout
        .create_session(auth.user_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Checkout session created successfully",
            "checkout": checkout
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout/place-order",
    request_body = PlaceOrder,
    responses(
        (status = 201, description = "Order created from the session"),
        (status = 400, description = "Checkout ID missing"),
        (status = 404, description = "Checkout session not found"),
        (status = 409, description = "Order already placed for this session")
    ),
    security(("bearer_auth" = [])),
    tag = "checkout"
)]
pub(crate) async fn place_order(
    State(services): State<AppServices>,
    auth: AuthUser,
    Json(request): Json<PlaceOrder>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let order = services.checkout.place_order(auth.user_id, request).await?;
    let order_number = order.order_number.clone();

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order placed successfully",
            "order": order,
            "orderId": order_number
        })),
    ))
}
