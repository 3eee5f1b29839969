//! # Authentication Data Transfer Objects
//!
//! Request and response structures for the authentication endpoints.
//!
//! ## Endpoints Using These DTOs
//!
//! - `POST /auth/signup` - [`SignupRequest`] (JSON) -> [`UserInfo`]
//! - `POST /auth/login` - [`LoginForm`] (form-encoded) -> [`TokenResponse`]
//! - `GET /auth/me` - bearer token -> [`UserInfo`]
//!
//! Failures on any endpoint carry an [`ErrorResponse`].
//!
//! ## Wire Format
//!
//! ```text
//! POST /auth/login
//! Content-Type: application/x-www-form-urlencoded
//!
//! username=alice&password=MyPassword123!
//! ```
//!
//! Response:
//! ```text
//! {
//!   "access_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "token_type": "bearer"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::model::store::User;

/// Token type reported alongside every access token.
pub const BEARER_TOKEN_TYPE: &str = "bearer";

/// Signup request body.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Desired username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
}

/// Login form, compatible with the OAuth2 password grant form fields.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Public view of a user. Never contains the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub username: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
        }
    }
}

/// Issued access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    /// Wrap a signed token as a bearer token response.
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable message
    pub detail: String,
    /// Stable error code
    pub code: String,
}
