//! OpenAPI document and Swagger UI wiring.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth;
use crate::entities::checkout_session::PaymentMethod;
use crate::entities::order::{OrderStatus, PaymentStatus};
use crate::entities::snapshots::{
    CustomerSnapshot, LineItem, SnapshotAddress, TimelineEntry,
};
use crate::errors::ErrorResponse;
use crate::handlers;
use crate::services::addresses::SaveAddress;
use crate::services::carts::{IncomingItem, NewCollectionCart, NewProductCart};
use crate::services::checkout::{CreateCheckout, PlaceOrder};
use crate::services::orders::{CancelOrder, Pagination, UpdateStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::me,
        handlers::carts::create_with_product,
        handlers::carts::create_with_collection,
        handlers::checkout::create_checkout,
        handlers::checkout::place_order,
        handlers::orders::list_orders,
        handlers::orders::list_all_orders,
        handlers::orders::get_order,
        handlers::orders::cancel_order,
        handlers::orders::update_status,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::UserResponse,
        auth::AuthResponse,
        NewProductCart,
        NewCollectionCart,
        IncomingItem,
        handlers::carts::UpdateCartItem,
        handlers::carts::RemoveCartItem,
        CreateCheckout,
        PlaceOrder,
        CancelOrder,
        UpdateStatus,
        SaveAddress,
        Pagination,
        PaymentMethod,
        OrderStatus,
        PaymentStatus,
        LineItem,
        CustomerSnapshot,
        SnapshotAddress,
        TimelineEntry,
        ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "carts", description = "Shopping carts"),
        (name = "checkout", description = "Checkout sessions and order placement"),
        (name = "orders", description = "Order queries, cancellation and fulfillment status")
    ),
    info(
        title = "Storefront API",
        description = "E-commerce storefront backend: catalog, carts, checkout and orders."
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
