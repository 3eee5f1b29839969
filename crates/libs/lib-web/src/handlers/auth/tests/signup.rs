//! # Signup Tests

use super::*;
use lib_core::dto::UserInfo;

#[tokio::test]
async fn test_signup_success() {
    let app = test_app(test_service());

    let response = send(&app, signup_request("testuser", "test@example.com", PASSWORD)).await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_bytes(response).await;
    let info: UserInfo = serde_json::from_slice(&body).unwrap();
    assert_eq!(info.username, "testuser");
    assert_eq!(info.email, "test@example.com");

    // only the public view goes back over the wire
    let raw: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(raw.get("password").is_none());
    assert!(raw.get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = app_with_alice().await;

    let response = send(&app, signup_request("alice", "other@example.com", PASSWORD)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = error_body(response).await;
    assert_eq!(error.detail, "Username already registered");
    assert_eq!(error.code, "UsernameConflict");
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = app_with_alice().await;

    let response = send(&app, signup_request("bob", "alice@example.com", PASSWORD)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = error_body(response).await;
    assert_eq!(error.detail, "Email already registered");
    assert_eq!(error.code, "EmailConflict");
}

#[tokio::test]
async fn test_signup_duplicate_both_reports_username() {
    let app = app_with_alice().await;

    let response = send(&app, signup_request("alice", "alice@example.com", PASSWORD)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.code, "UsernameConflict");
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let app = test_app(test_service());

    let response = send(&app, signup_request("testuser", "not-an-email", PASSWORD)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.code, "InvalidInput");
}

#[tokio::test]
async fn test_signup_empty_password() {
    let app = test_app(test_service());

    let response = send(&app, signup_request("testuser", "test@example.com", "")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.code, "InvalidInput");
}

#[tokio::test]
async fn test_signup_missing_field_is_rejected() {
    let app = test_app(test_service());

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"testuser"}"#))
            .unwrap(),
    )
    .await;

    assert!(response.status().is_client_error());
}
