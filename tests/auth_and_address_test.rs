mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn registration_issues_a_usable_token() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Asha",
                "email": "asha@example.com",
                "password": "s3cret!pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["name"], "Asha");
    let user_id = body["user"]["userId"].as_str().unwrap();
    assert!(user_id.starts_with("USR-"), "got {}", user_id);

    let token = body["token"].as_str().unwrap();
    let (status, body) = app.request(Method::GET, "/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "asha@example.com");
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::spawn().await;
    app.register("Asha", "asha@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Someone Else",
                "email": "asha@example.com",
                "password": "another-pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = TestApp::spawn().await;
    app.register("Asha", "asha@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "asha@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "asha@example.com", "password": "s3cret!pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_requires_every_field() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "x@example.com", "password": "pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name is required");
}

#[tokio::test]
async fn address_upsert_round_trip() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha@example.com").await;

    // Nothing saved yet: empty object.
    let (status, body) = app
        .request(Method::GET, "/api/v1/shipping-address", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    app.save_address(&token).await;

    let (_, body) = app
        .request(Method::GET, "/api/v1/shipping-address", Some(&token), None)
        .await;
    assert_eq!(body["city"], "Pune");
    // Name and email come from the account, not the payload.
    assert_eq!(body["name"], "Asha");
    assert_eq!(body["email"], "asha@example.com");
    assert_eq!(body["country"], "India");

    // Saving again replaces in place.
    let (status, body) = app
        .request(
            Method::PUT,
            "/api/v1/shipping-address",
            Some(&token),
            Some(json!({
                "street": "44 Brigade Road",
                "city": "Bengaluru",
                "state": "Karnataka",
                "pincode": "560001",
                "phone": "9876543210"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Bengaluru");
}

#[tokio::test]
async fn address_save_lists_all_missing_fields() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha@example.com").await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/v1/shipping-address",
            Some(&token),
            Some(json!({ "city": "Pune", "state": "Maharashtra" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Missing required fields: street, pincode, phone"
    );
}

#[tokio::test]
async fn address_delete_round_trip() {
    let app = TestApp::spawn().await;
    let token = app.register("Asha", "asha@example.com").await;

    let (status, body) = app
        .request(
            Method::DELETE,
            "/api/v1/shipping-address",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Shipping address not found");

    app.save_address(&token).await;

    let (status, body) = app
        .request(
            Method::DELETE,
            "/api/v1/shipping-address",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Shipping address deleted successfully");
    assert_eq!(body["deletedAddress"]["city"], "Pune");
}
