//! Shared harness: the full router over an in-memory SQLite database, driven
//! with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_api::build_router;
use storefront_api::config::AppConfig;
use storefront_api::events::{process_events, EventSender};
use storefront_api::handlers::AppServices;
use storefront_api::migrator::Migrator;

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = test_config();

        // Single connection: every pooled connection to :memory: would
        // otherwise get its own empty database.
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options).await.expect("in-memory sqlite");
        Migrator::up(&db, None).await.expect("migrations");

        let (tx, rx) = tokio::sync::mpsc::channel(64);
        tokio::spawn(process_events(rx));

        let services = AppServices::new(db.clone(), &config, EventSender::new(tx));
        Self {
            router: build_router(db, services, &config),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    /// Registers a fresh account and returns its bearer token.
    pub async fn register(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": "s3cret!pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Saves a complete shipping address for the token's account.
    pub async fn save_address(&self, token: &str) {
        let (status, body) = self
            .request(
                Method::PUT,
                "/api/v1/shipping-address",
                Some(token),
                Some(json!({
                    "street": "12 MG Road",
                    "city": "Pune",
                    "state": "Maharashtra",
                    "pincode": "411001",
                    "phone": "9876543210"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "save address failed: {}", body);
    }

    /// Creates a single-product cart and returns its id.
    pub async fn create_product_cart(&self, token: &str, price: i64, quantity: i64) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/carts/product",
                Some(token),
                Some(json!({
                    "productId": "prod-1",
                    "name": "Linen Shirt",
                    "price": price,
                    "quantity": quantity,
                    "selectedSize": "M",
                    "selectedColor": "Blue"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create cart failed: {}", body);
        body["cart"]["id"].as_str().unwrap().to_string()
    }

    /// Creates a checkout session for the cart and returns its id.
    pub async fn create_checkout(&self, token: &str, cart_id: &str, payment_method: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/checkout",
                Some(token),
                Some(json!({
                    "cartId": cart_id,
                    "paymentMethod": payment_method,
                    "shippingCost": 50
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create checkout failed: {}", body);
        body["checkout"]["id"].as_str().unwrap().to_string()
    }

    /// Full flow from cart to placed order; returns the order number.
    pub async fn place_order(&self, token: &str, payment_method: &str) -> String {
        let cart_id = self.create_product_cart(token, 1000, 2).await;
        let checkout_id = self.create_checkout(token, &cart_id, payment_method).await;

        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/checkout/place-order",
                Some(token),
                Some(json!({ "checkoutId": checkout_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "place order failed: {}", body);
        body["orderId"].as_str().unwrap().to_string()
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiration: 3600,
        auth_issuer: "storefront-api".to_string(),
        auth_audience: "storefront-clients".to_string(),
        environment: "test".to_string(),
        log_level: "warn".to_string(),
        log_json: false,
        auto_migrate: false,
        db_max_connections: 5,
        db_min_connections: 1,
        db_connect_timeout_secs: 5,
        cors_allowed_origins: vec!["*".to_string()],
    }
}
