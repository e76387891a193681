mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn product_crud_round_trip() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/products",
            None,
            Some(json!({
                "name": "Linen Shirt",
                "description": "Breathable summer wear",
                "price": 1499,
                "sizes": ["S", "M", "L"],
                "colors": ["Blue", "White"],
                "category": "shirts"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Linen Shirt");
    // Original price falls back to the price when not supplied.
    assert_eq!(body["originalPrice"], body["price"]);
    assert_eq!(body["availability"], true);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(Method::GET, &format!("/api/v1/products/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sizes"].as_array().unwrap().len(), 3);

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/v1/products/{}", id),
            None,
            Some(json!({ "availability": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["availability"], false);
    assert_eq!(body["name"], "Linen Shirt");

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/products/{}", id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, body) = app
        .request(Method::GET, &format!("/api/v1/products/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn product_creation_requires_a_name() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/products",
            None,
            Some(json!({ "price": 999 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name is required");
}

#[tokio::test]
async fn collection_crud_round_trip() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/collections",
            None,
            Some(json!({ "name": "Summer", "description": "Warm-weather picks" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (_, body) = app
        .request(Method::GET, "/api/v1/collections", None, None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/collections/{}", id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Collection deleted successfully");

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/api/v1/collections/{}", id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Collection not found");
}
