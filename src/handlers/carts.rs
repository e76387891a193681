use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::carts::{NewCollectionCart, NewProductCart, RemovalOutcome};

use super::AppServices;

pub fn routes() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_carts))
        .route("/product", post(create_with_product))
        .route("/collection", post(create_with_collection))
        .route("/item", put(update_item).delete(remove_item))
        .route("/:cart_id", get(get_cart).delete(delete_cart))
}

async fn list_carts(
    State(services): State<AppServices>,
    auth: AuthUser,
) -> Result<Json<Value>, ServiceError> {
    let carts = services.carts.list_for_owner(auth.user_id).await?;

    let message = if carts.is_empty() {
        "No carts found".to_string()
    } else {
        format!("Found {} cart(s)", carts.len())
    };

    Ok(Json(json!({ "carts": carts, "message": message })))
}

#[utoipa::path(
    post,
    path = "/api/v1/carts/product",
    request_body = NewProductCart,
    responses(
        (status = 201, description = "New cart created holding the product"),
        (status = 400, description = "Missing required product details")
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
pub(crate) async fn create_with_product(
    State(services): State<AppServices>,
    auth: AuthUser,
    Json(request): Json<NewProductCart>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let cart = services
        .carts
        .create_with_product(auth.user_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "New cart created with product", "cart": cart })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/carts/collection",
    request_body = NewCollectionCart,
    responses(
        (status = 201, description = "New cart created from the collection"),
        (status = 400, description = "An item failed validation; no cart created")
    ),
    security(("bearer_auth" = [])),
    tag = "carts"
)]
pub(crate) async fn create_with_collection(
    State(services): State<AppServices>,
    auth: AuthUser,
    Json(request): Json<NewCollectionCart>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let cart = services
        .carts
        .create_with_collection(auth.user_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "New cart created with collection products",
            "cart": cart
        })),
    ))
}

async fn get_cart(
    State(services): State<AppServices>,
    auth: AuthUser,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<Value>, ServiceError> {
    let cart = services.carts.get_for_owner(cart_id, auth.user_id).await?;
    Ok(Json(json!(cart)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItem {
    pub cart_id: Option<Uuid>,
    pub product_id: Option<String>,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
    pub quantity: Option<i32>,
}

async fn update_item(
    State(services): State<AppServices>,
    auth: AuthUser,
    Json(request): Json<UpdateCartItem>,
) -> Result<Json<Value>, ServiceError> {
    let (cart_id, product_id, selected_size, selected_color, quantity) = match (
        request.cart_id,
        request.product_id,
        request.selected_size,
        request.selected_color,
        request.quantity,
    ) {
        (Some(id), Some(p), Some(s), Some(c), Some(q)) if !p.is_empty() => (id, p, s, c, q),
        _ => {
            return Err(ServiceError::ValidationError(
                "Missing required fields: cartId, productId, selectedSize, selectedColor, and quantity are required"
                    .to_string(),
            ))
        }
    };

    let cart = services
        .carts
        .update_item_quantity(
            auth.user_id,
            cart_id,
            &product_id,
            &selected_size,
            &selected_color,
            quantity,
        )
        .await?;

    Ok(Json(json!({
        "message": "Cart item updated successfully",
        "cart": cart
    })))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartItem {
    pub cart_id: Option<Uuid>,
    pub product_id: Option<String>,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

async fn remove_item(
    State(services): State<AppServices>,
    auth: AuthUser,
    Json(request): Json<RemoveCartItem>,
) -> Result<Json<Value>, ServiceError> {
    let (cart_id, product_id, selected_size, selected_color) = match (
        request.cart_id,
        request.product_id,
        request.selected_size,
        request.selected_color,
    ) {
        (Some(id), Some(p), Some(s), Some(c)) if !p.is_empty() => (id, p, s, c),
        _ => {
            return Err(ServiceError::ValidationError(
                "Missing required fields: cartId, productId, selectedSize, and selectedColor are required"
                    .to_string(),
            ))
        }
    };

    let outcome = services
        .carts
        .remove_item(
            auth.user_id,
            cart_id,
            &product_id,
            &selected_size,
            &selected_color,
        )
        .await?;

    let body = match outcome {
        RemovalOutcome::CartDeleted => json!({
            "message": "Cart is now empty and deleted",
            "cart": Value::Null
        }),
        RemovalOutcome::Updated(cart) => json!({
            "message": "Item removed from cart",
            "cart": cart
        }),
    };

    Ok(Json(body))
}

async fn delete_cart(
    State(services): State<AppServices>,
    auth: AuthUser,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<Value>, ServiceError> {
    services.carts.delete(auth.user_id, cart_id).await?;

    Ok(Json(json!({
        "message": "Cart deleted successfully",
        "deletedCartId": cart_id
    })))
}
