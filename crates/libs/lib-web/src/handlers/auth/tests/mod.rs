//! # Auth Handler Tests
//!
//! Requests go through the full router, middleware included, backed by an
//! in-memory store.

mod signup;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Duration;
use lib_auth::TokenCodec;
use lib_core::dto::{ErrorResponse, SignupRequest};
use lib_core::MemoryUserStore;
use std::sync::Arc;
use tower::ServiceExt;

use crate::server::{create_router, AppState, ServerConfig};
use crate::services::AuthService;

pub const SECRET: &str = "test-secret-key-must-be-at-least-32-characters-long!";
pub const PASSWORD: &str = "TestPassword123!";

/// Create test service over a fresh in-memory store
pub fn test_service() -> AuthService {
    AuthService::new(
        Arc::new(MemoryUserStore::new()),
        TokenCodec::new(SECRET, Duration::minutes(60)),
    )
}

/// Create test app with routes
pub fn test_app(service: AuthService) -> Router {
    create_router(AppState::new(service), &ServerConfig::default())
}

pub fn signup_request(username: &str, email: &str, password: &str) -> Request<Body> {
    let req = SignupRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };

    Request::builder()
        .method("POST")
        .uri("/auth/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&req).unwrap()))
        .unwrap()
}

pub fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap()
}

pub fn me_request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/auth/me");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn error_body(response: Response) -> ErrorResponse {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Register `alice` and return the app.
pub async fn app_with_alice() -> Router {
    let app = test_app(test_service());
    let response = send(&app, signup_request("alice", "alice@example.com", PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    app
}
