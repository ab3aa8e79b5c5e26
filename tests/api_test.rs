//! HTTP tests driving the full router over an in-memory store.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use merch_api::api::create_router;

use common::{setup, TestContext, ADMIN_EMAIL, PASSWORD};

async fn send(
    app: &Router,
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
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn signup(app: &Router, first_name: &str, email: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/signup",
        None,
        Some(json!({
            "first_name": first_name,
            "last_name": "Tester",
            "email": email,
            "phone_number": "+447700900123",
            "password": PASSWORD,
        })),
    )
    .await
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["jwToken"].as_str().unwrap().to_string()
}

struct Harness {
    _ctx: TestContext,
    app: Router,
    admin_token: String,
    customer_token: String,
}

async fn harness() -> Harness {
    let ctx = setup().await;
    let app = create_router(ctx.app_state());

    signup(&app, "Admin", ADMIN_EMAIL).await;
    signup(&app, "Ada", "ada@example.com").await;
    let admin_token = login(&app, ADMIN_EMAIL).await;
    let customer_token = login(&app, "ada@example.com").await;

    Harness {
        _ctx: ctx,
        app,
        admin_token,
        customer_token,
    }
}

async fn create_product(h: &Harness, name: &str, price_cents: i64) -> String {
    let (status, body) = send(
        &h.app,
        Method::POST,
        "/admin/products",
        Some(&h.admin_token),
        Some(json!({
            "name": name,
            "description": "Hooded wool cloak",
            "image": "img.png",
            "price_cents": price_cents,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["product_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_reports_redis_disabled() {
    let ctx = setup().await;
    let app = create_router(ctx.app_state());

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["redis"]["status"], "disabled");
}

#[tokio::test]
async fn test_signup_and_duplicate() {
    let ctx = setup().await;
    let app = create_router(ctx.app_state());

    let (status, body) = signup(&app, "Ada", "ada@example.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = signup(&app, "Ada", "ada@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_signup_validation_error() {
    let ctx = setup().await;
    let app = create_router(ctx.app_state());

    let (status, body) = signup(&app, "Ada", "not-an-email").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let ctx = setup().await;
    let app = create_router(ctx.app_state());
    signup(&app, "Ada", "ada@example.com").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "WrongPass123!" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cart_requires_token() {
    let h = harness().await;

    let (status, _) = send(&h.app, Method::GET, "/carts/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&h.app, Method::GET, "/carts/cart", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_kinds_are_not_interchangeable() {
    let h = harness().await;

    let (status, _) = send(
        &h.app,
        Method::GET,
        "/admin/users",
        Some(&h.customer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&h.app, Method::GET, "/carts/cart", Some(&h.admin_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&h.app, Method::GET, "/admin/users", Some(&h.admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_catalog_browsing() {
    let h = harness().await;
    let product_id = create_product(&h, "Cloak", 2999).await;

    let (status, body) = send(&h.app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &h.app,
        Method::GET,
        &format!("/products/{}", product_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price_cents"], 2999);

    let (status, body) = send(
        &h.app,
        Method::GET,
        "/products/catalog?product_name=clo",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Cloak");

    let (status, body) = send(&h.app, Method::GET, "/products/prd-missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "PRODUCT_NOT_FOUND");
}

#[tokio::test]
async fn test_cart_flow() {
    let h = harness().await;
    let product_id = create_product(&h, "Cloak", 2999).await;
    let token = Some(h.customer_token.as_str());

    let (status, body) = send(
        &h.app,
        Method::POST,
        "/carts/additem",
        token,
        Some(json!({ "product_id": product_id, "quantity": 2, "color": "black", "size": "M" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["quantity"], 2);

    let (status, body) = send(
        &h.app,
        Method::POST,
        "/carts/additem",
        token,
        Some(json!({ "product_id": product_id, "quantity": 3, "color": "red", "size": "L" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["quantity"], 5);
    assert_eq!(body["data"]["color"], "red");

    let (status, body) = send(
        &h.app,
        Method::PUT,
        "/carts/updateitem",
        token,
        Some(json!({ "product_id": product_id, "quantity": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item updated");

    let (status, body) = send(&h.app, Method::GET, "/carts/cart", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["line_count"], 1);
    assert_eq!(body["data"]["summary"]["total_quantity"], 4);
    assert_eq!(body["data"]["summary"]["subtotal_cents"], 2999 * 4);

    let (status, body) = send(
        &h.app,
        Method::GET,
        &format!("/carts/item?product_id={}", product_id),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product_name"], "Cloak");

    let (status, _) = send(
        &h.app,
        Method::DELETE,
        "/carts/removeitem",
        token,
        Some(json!({ "product_id": product_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &h.app,
        Method::DELETE,
        "/carts/removeitem",
        token,
        Some(json!({ "product_id": product_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "ITEM_NOT_FOUND");
}

#[tokio::test]
async fn test_add_unknown_product() {
    let h = harness().await;

    let (status, body) = send(
        &h.app,
        Method::POST,
        "/carts/additem",
        Some(&h.customer_token),
        Some(json!({ "product_id": "prd-missing", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "PRODUCT_NOT_FOUND");
}

#[tokio::test]
async fn test_add_with_zero_quantity() {
    let h = harness().await;
    let product_id = create_product(&h, "Cloak", 2999).await;

    let (status, _) = send(
        &h.app,
        Method::POST,
        "/carts/additem",
        Some(&h.customer_token),
        Some(json!({ "product_id": product_id, "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_address_endpoints() {
    let h = harness().await;
    let token = Some(h.customer_token.as_str());

    let (status, body) = send(
        &h.app,
        Method::POST,
        "/users/addresses",
        token,
        Some(json!({
            "house_no": "221B",
            "street": "Baker Street",
            "city": "London",
            "postal_code": "NW1 6XE",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["phone_number"], "+447700900123");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&h.app, Method::GET, "/users/addresses", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let path = format!("/users/addresses/{}", id);
    let (status, _) = send(&h.app, Method::DELETE, &path, token, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&h.app, Method::DELETE, &path, token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_broadcast_and_product_removal() {
    let h = harness().await;
    let product_id = create_product(&h, "Cloak", 2999).await;

    let (status, body) = send(
        &h.app,
        Method::POST,
        "/admin/broadcast",
        Some(&h.admin_token),
        Some(json!({ "subject": "Winter sale", "body": "Half off" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["queued"], 2);

    let (status, _) = send(
        &h.app,
        Method::POST,
        "/admin/broadcast",
        Some(&h.customer_token),
        Some(json!({ "subject": "Spam", "body": "Spam" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let path = format!("/admin/products/{}", product_id);
    let (status, _) = send(&h.app, Method::DELETE, &path, Some(&h.admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&h.app, Method::DELETE, &path, Some(&h.admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
