//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] returned by
//! every store and service operation. It follows the `thiserror` pattern.
//!
//! ## Error Categories
//!
//! 1. **Registration** - [`UsernameConflict`](AppError::UsernameConflict),
//!    [`EmailConflict`](AppError::EmailConflict), [`InvalidInput`](AppError::InvalidInput) → 400
//! 2. **Login** - [`InvalidCredentials`](AppError::InvalidCredentials) → 401
//! 3. **Identity** - [`Unauthenticated`](AppError::Unauthenticated) → 401 with `WWW-Authenticate: Bearer`
//! 4. **Server** - [`Config`](AppError::Config), [`Internal`](AppError::Internal) → 500
//!
//! `InvalidCredentials` covers both an unknown username and a wrong password.
//! `Unauthenticated` covers malformed, forged, and expired tokens as well as a
//! subject that no longer exists. Neither says which case occurred.
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn require_name(name: &str) -> Result<&str> {
//!     if name.is_empty() {
//!         return Err(AppError::InvalidInput("Username cannot be empty".to_string()));
//!     }
//!     Ok(name)
//! }
//! ```

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::dto::ErrorResponse;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The username is already registered.
    #[error("Username already registered")]
    UsernameConflict,

    /// The email is already registered.
    #[error("Email already registered")]
    EmailConflict,

    /// Unknown username or wrong password.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// The presented token does not resolve to a live user.
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// Invalid user input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal failure (storage, hashing, signing).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UsernameConflict | AppError::EmailConflict | AppError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-facing message.
    ///
    /// Server-side failures collapse to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Config(_) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UsernameConflict => "UsernameConflict",
            AppError::EmailConflict => "EmailConflict",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::Unauthenticated => "Unauthenticated",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = Json(ErrorResponse {
            detail: self.user_message(),
            code: self.code().to_string(),
        });

        let mut res = (status, body).into_response();
        if self == AppError::Unauthenticated {
            res.headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        res
    }
}

/// Convert `sqlx::Error` to `AppError`.
///
/// UNIQUE violations on the `users` table become the matching conflict, so a
/// registration that loses a race still reports a well-defined outcome.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let message = db_err.message();
                if message.contains("users.username") {
                    AppError::UsernameConflict
                } else if message.contains("users.email") {
                    AppError::EmailConflict
                } else {
                    AppError::Internal(format!("Database error: {}", message))
                }
            }
            sqlx::Error::Database(db_err) => {
                AppError::Internal(format!("Database error: {}", db_err.message()))
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}
