pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod ids;
pub mod migrator;
pub mod openapi;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, routing::get, Extension, Json, Router};
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_routes, AuthService};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::handlers::{api_v1_routes, AppServices};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Assembles the full application router. Shared between the binary and the
/// integration test harness.
pub fn build_router(db: DbPool, services: AppServices, config: &AppConfig) -> Router {
    let auth: Arc<AuthService> = services.auth.clone();

    Router::new()
        .nest("/auth", auth_routes().with_state(auth.clone()))
        .nest("/api/v1", api_v1_routes().with_state(services))
        .merge(openapi::swagger_ui())
        .route("/health", get(health))
        .layer(Extension(auth))
        .layer(Extension(db))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(CompressionLayer::new())
        .layer(cors_layer(config))
}

async fn health(Extension(db): Extension<DbPool>) -> Json<Value> {
    let database = if db::check_connection(&db).await {
        "up"
    } else {
        "down"
    };
    Json(json!({ "status": "ok", "database": database }))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
