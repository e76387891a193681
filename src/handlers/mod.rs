//! HTTP surface. Route modules stay thin: decode the request, call the
//! service, shape the response envelope.

pub mod addresses;
pub mod carts;
pub mod checkout;
pub mod collections;
pub mod orders;
pub mod products;

use std::sync::Arc;

use axum::Router;

use crate::auth::{AuthConfig, AuthService};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::ids::RandomIdGenerator;
use crate::services::{
    AddressService, CartService, CatalogService, CheckoutService, OrderService,
    PermissiveTransitions,
};

/// Shared service handles, cloned into every route.
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub carts: Arc<CartService>,
    pub checkout: Arc<CheckoutService>,
    pub orders: Arc<OrderService>,
    pub addresses: Arc<AddressService>,
    pub catalog: Arc<CatalogService>,
}

impl AppServices {
    pub fn new(db: DbPool, config: &AppConfig, events: EventSender) -> Self {
        let ids = Arc::new(RandomIdGenerator);
        let policy = Arc::new(PermissiveTransitions);

        Self {
            auth: Arc::new(AuthService::new(
                db.clone(),
                AuthConfig::from(config),
                ids.clone(),
                events.clone(),
            )),
            carts: Arc::new(CartService::new(db.clone(), events.clone())),
            checkout: Arc::new(CheckoutService::new(db.clone(), events.clone(), ids)),
            orders: Arc::new(OrderService::new(db.clone(), events, policy)),
            addresses: Arc::new(AddressService::new(db.clone())),
            catalog: Arc::new(CatalogService::new(db)),
        }
    }
}

/// Everything under `/api/v1`.
pub fn api_v1_routes() -> Router<AppServices> {
    Router::new()
        .nest("/carts", carts::routes())
        .nest("/checkout", checkout::routes())
        .nest("/orders", orders::routes())
        .nest("/shipping-address", addresses::routes())
        .nest("/products", products::routes())
        .nest("/collections", collections::routes())
}
