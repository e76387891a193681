use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::catalog::{NewProduct, UpdateProduct};

use super::AppServices;

pub fn routes() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn create_product(
    State(services): State<AppServices>,
    Json(request): Json<NewProduct>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let product = services.catalog.create_product(request).await?;
    Ok((StatusCode::CREATED, Json(json!(product))))
}

async fn list_products(
    State(services): State<AppServices>,
) -> Result<Json<Value>, ServiceError> {
    let products = services.catalog.list_products().await?;
    Ok(Json(json!(products)))
}

async fn get_product(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ServiceError> {
    let product = services.catalog.get_product(id).await?;
    Ok(Json(json!(product)))
}

async fn update_product(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProduct>,
) -> Result<Json<Value>, ServiceError> {
    let product = services.catalog.update_product(id, request).await?;
    Ok(Json(json!(product)))
}

async fn delete_product(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ServiceError> {
    services.catalog.delete_product(id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
