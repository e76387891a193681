mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use common::TestApp;

fn decimal(value: &serde_json::Value) -> Decimal {
    value
        .as_str()
        .map(|s| s.parse().unwrap())
        .or_else(|| value.as_f64().and_then(Decimal::from_f64_retain))
        .unwrap_or_else(|| panic!("not a decimal: {}", value))
}

#[tokio::test]
async fn cart_requests_without_token_are_rejected() {
    let app = TestApp::spawn().await;

    let (status, body) = app.request(Method::GET, "/api/v1/carts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token, authorization denied");
}

#[tokio::test]
async fn product_cart_lifecycle() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha@example.com").await;

    // Empty list first.
    let (status, body) = app
        .request(Method::GET, "/api/v1/carts", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No carts found");
    assert_eq!(body["carts"].as_array().unwrap().len(), 0);

    let cart_id = app.create_product_cart(&token, 1000, 2).await;

    let (status, body) = app
        .request(Method::GET, "/api/v1/carts", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Found 1 cart(s)");
    assert_eq!(decimal(&body["carts"][0]["total"]), dec!(2000));

    // Bump the quantity; the total is recomputed on save.
    let (status, body) = app
        .request(
            Method::PUT,
            "/api/v1/carts/item",
            Some(&token),
            Some(json!({
                "cartId": cart_id,
                "productId": "prod-1",
                "selectedSize": "M",
                "selectedColor": "Blue",
                "quantity": 3
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cart item updated successfully");
    assert_eq!(decimal(&body["cart"]["total"]), dec!(3000));
    assert_eq!(body["cart"]["items"][0]["quantity"], 3);

    // Removing the only item deletes the cart.
    let (status, body) = app
        .request(
            Method::DELETE,
            "/api/v1/carts/item",
            Some(&token),
            Some(json!({
                "cartId": cart_id,
                "productId": "prod-1",
                "selectedSize": "M",
                "selectedColor": "Blue"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cart is now empty and deleted");
    assert!(body["cart"].is_null());

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/v1/carts/{}", cart_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_product_details_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha2@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/carts/product",
            Some(&token),
            Some(json!({ "name": "Linen Shirt" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required product details");
}

#[tokio::test]
async fn product_cart_rejects_out_of_range_quantity() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha9@example.com").await;

    for quantity in [0, 99] {
        let (status, body) = app
            .request(
                Method::POST,
                "/api/v1/carts/product",
                Some(&token),
                Some(json!({
                    "productId": "prod-1",
                    "name": "Linen Shirt",
                    "price": 1000,
                    "quantity": quantity,
                    "selectedSize": "M",
                    "selectedColor": "Blue"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Quantity must be a number between 1 and 10");
    }

    // Nothing persisted.
    let (_, body) = app
        .request(Method::GET, "/api/v1/carts", Some(&token), None)
        .await;
    assert_eq!(body["carts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn collection_cart_validation_is_all_or_nothing() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha3@example.com").await;

    let good = json!({
        "productId": "p1", "name": "Tee", "price": 499,
        "selectedSize": "M", "selectedColor": "Red", "quantity": 1
    });
    let bad_price = json!({
        "productId": "p2", "name": "Tee", "price": 0,
        "selectedSize": "L", "selectedColor": "Blue", "quantity": 1
    });

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/carts/collection",
            Some(&token),
            Some(json!({
                "collectionId": "col-1",
                "collectionName": "Summer",
                "items": [good, bad_price]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid price for item 2");

    // Nothing persisted.
    let (_, body) = app
        .request(Method::GET, "/api/v1/carts", Some(&token), None)
        .await;
    assert_eq!(body["carts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn collection_cart_quantity_bounds() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha4@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/carts/collection",
            Some(&token),
            Some(json!({
                "collectionId": "col-1",
                "collectionName": "Summer",
                "items": [{
                    "productId": "p1", "name": "Tee", "price": 499,
                    "selectedSize": "M", "selectedColor": "Red", "quantity": 11
                }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Quantity must be between 1 and 10 for item 1");
}

#[tokio::test]
async fn update_quantity_outside_bounds_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha5@example.com").await;
    let cart_id = app.create_product_cart(&token, 500, 1).await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/v1/carts/item",
            Some(&token),
            Some(json!({
                "cartId": cart_id,
                "productId": "prod-1",
                "selectedSize": "M",
                "selectedColor": "Blue",
                "quantity": 0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Quantity must be a number between 1 and 10");
}

#[tokio::test]
async fn duplicate_triples_only_touch_the_first_match() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha6@example.com").await;

    let item = |qty: i64| {
        json!({
            "productId": "p1", "name": "Tee", "price": 100,
            "selectedSize": "M", "selectedColor": "Red", "quantity": qty
        })
    };

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/carts/collection",
            Some(&token),
            Some(json!({
                "collectionId": "col-1",
                "collectionName": "Summer",
                "items": [item(1), item(2)]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let cart_id = body["cart"]["id"].as_str().unwrap().to_string();

    let (_, body) = app
        .request(
            Method::PUT,
            "/api/v1/carts/item",
            Some(&token),
            Some(json!({
                "cartId": cart_id,
                "productId": "p1",
                "selectedSize": "M",
                "selectedColor": "Red",
                "quantity": 5
            })),
        )
        .await;
    assert_eq!(body["cart"]["items"][0]["quantity"], 5);
    assert_eq!(body["cart"]["items"][1]["quantity"], 2);

    // Removal also hits only the first match.
    let (_, body) = app
        .request(
            Method::DELETE,
            "/api/v1/carts/item",
            Some(&token),
            Some(json!({
                "cartId": cart_id,
                "productId": "p1",
                "selectedSize": "M",
                "selectedColor": "Red"
            })),
        )
        .await;
    assert_eq!(body["message"], "Item removed from cart");
    assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["cart"]["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn removing_a_missing_item_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha7@example.com").await;
    let cart_id = app.create_product_cart(&token, 500, 1).await;

    let (status, body) = app
        .request(
            Method::DELETE,
            "/api/v1/carts/item",
            Some(&token),
            Some(json!({
                "cartId": cart_id,
                "productId": "prod-1",
                "selectedSize": "XL",
                "selectedColor": "Blue"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found in cart");
}

#[tokio::test]
async fn carts_are_scoped_to_their_owner() {
    let app = TestApp::spawn().await;
    let owner = app.register("Asha", "asha8@example.com").await;
    let intruder = app.register("Ravi", "ravi@example.com").await;

    let cart_id = app.create_product_cart(&owner, 750, 1).await;

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/v1/carts/{}", cart_id),
            Some(&intruder),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
