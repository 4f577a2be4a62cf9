//! HTTP surface tests driving the router with `oneshot`.

mod support;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_service_lib::create_router;
use support::Harness;

fn app(h: &Harness) -> Router {
    create_router(h.state(), &["*".to_string()])
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_bearer(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn register_and_login(h: &Harness) -> Value {
    let (status, _) = send(
        app(h),
        post_json(
            "/api/v1/auth/register",
            json!({"username": "alice", "email": "a@x.com", "password": "password1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app(h),
        post_json(
            "/api/v1/auth/login",
            json!({"username": "alice", "password": "password1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_register_returns_public_account() {
    let h = Harness::new();
    let (status, body) = send(
        app(&h),
        post_json(
            "/api/v1/auth/register",
            json!({"username": "alice", "email": "a@x.com", "password": "password1"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "username": "alice", "email": "a@x.com"}));
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let h = Harness::new();
    register_and_login(&h).await;

    let (status, body) = send(
        app(&h),
        post_json(
            "/api/v1/auth/register",
            json!({"username": "alice", "email": "new@x.com", "password": "password1"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ACCOUNT_EXISTS");
}

#[tokio::test]
async fn test_register_validation() {
    let h = Harness::new();
    let (status, body) = send(
        app(&h),
        post_json(
            "/api/v1/auth/register",
            json!({"username": "al", "email": "not-an-email", "password": "short"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_and_me() {
    let h = Harness::new();
    let tokens = register_and_login(&h).await;
    assert_eq!(tokens["token_type"], "Bearer");
    assert_eq!(tokens["expires_in"], 900);

    let access = tokens["access_token"].as_str().unwrap();
    let (status, body) = send(app(&h), with_bearer(Method::GET, "/api/v1/auth/me", access)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "username": "alice"}));
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let h = Harness::new();
    register_and_login(&h).await;

    let (status, body) = send(
        app(&h),
        post_json(
            "/api/v1/auth/login",
            json!({"username": "alice", "password": "password2"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_refresh_rotates_and_rejects_reuse() {
    let h = Harness::new();
    let tokens = register_and_login(&h).await;
    let refresh = json!({"refresh_token": tokens["refresh_token"]});

    let (status, rotated) = send(app(&h), post_json("/api/v1/auth/refresh", refresh.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);

    let (status, body) = send(app(&h), post_json("/api/v1/auth/refresh", refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_logout_requires_bearer() {
    let h = Harness::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/logout")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&h), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_logout_revokes_refresh() {
    let h = Harness::new();
    let tokens = register_and_login(&h).await;
    let access = tokens["access_token"].as_str().unwrap();

    let logout = with_bearer(Method::POST, "/api/v1/auth/logout", access);
    let (status, body) = send(app(&h), logout).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(
        app(&h),
        post_json(
            "/api/v1/auth/refresh",
            json!({"refresh_token": tokens["refresh_token"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_rejected_as_bearer() {
    let h = Harness::new();
    let tokens = register_and_login(&h).await;
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let (status, body) = send(app(&h), with_bearer(Method::GET, "/api/v1/auth/me", refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_health_probes() {
    let h = Harness::new();

    let live = Request::builder().uri("/health/live").body(Body::empty()).unwrap();
    let (status, _) = send(app(&h), live).await;
    assert_eq!(status, StatusCode::OK);

    let ready = Request::builder().uri("/health/ready").body(Body::empty()).unwrap();
    let (status, body) = send(app(&h), ready).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["services"]["session_store"]["status"], "healthy");
}
