use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::addresses::SaveAddress;

use super::AppServices;

pub fn routes() -> Router<AppServices> {
    Router::new().route("/", get(get_address).put(save_address).delete(delete_address))
}

/// Returns the saved address, or an empty object when none exists yet.
async fn get_address(
    State(services): State<AppServices>,
    auth: AuthUser,
) -> Result<Json<Value>, ServiceError> {
    let address = services.addresses.get_for_owner(auth.user_id).await?;
    Ok(Json(match address {
        Some(address) => json!(address),
        None => json!({}),
    }))
}

async fn save_address(
    State(services): State<AppServices>,
    auth: AuthUser,
    Json(request): Json<SaveAddress>,
) -> Result<Json<Value>, ServiceError> {
    let address = services.addresses.save(auth.user_id, request).await?;
    Ok(Json(json!(address)))
}

async fn delete_address(
    State(services): State<AppServices>,
    auth: AuthUser,
) -> Result<Json<Value>, ServiceError> {
    let deleted = services.addresses.delete(auth.user_id).await?;
    Ok(Json(json!({
        "message": "Shipping address deleted successfully",
        "deletedAddress": deleted
    })))
}
