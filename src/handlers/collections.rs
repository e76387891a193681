use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::catalog::{NewCollection, UpdateCollection};

use super::AppServices;

pub fn routes() -> Router<AppServices> {
    Router::new()
        .route("/", get(list_collections).post(create_collection))
        .route(
            "/:id",
            get(get_collection)
                .put(update_collection)
                .delete(delete_collection),
        )
}

async fn create_collection(
    State(services): State<AppServices>,
    Json(request): Json<NewCollection>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let collection = services.catalog.create_collection(request).await?;
    Ok((StatusCode::CREATED, Json(json!(collection))))
}

async fn list_collections(
    State(services): State<AppServices>,
) -> Result<Json<Value>, ServiceError> {
    let collections = services.catalog.list_collections().await?;
    Ok(Json(json!(collections)))
}

async fn get_collection(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ServiceError> {
    let collection = services.catalog.get_collection(id).await?;
    Ok(Json(json!(collection)))
}

async fn update_collection(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCollection>,
) -> Result<Json<Value>, ServiceError> {
    let collection = services.catalog.update_collection(id, request).await?;
    Ok(Json(json!(collection)))
}

async fn delete_collection(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ServiceError> {
    services.catalog.delete_collection(id).await?;
    Ok(Json(json!({ "message": "Collection deleted successfully" })))
}
