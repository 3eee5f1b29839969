//! # Authentication Middleware
//!
//! Extracts the `Authorization: Bearer <token>` header, resolves it to the live
//! user through [`AuthService::resolve_identity`], and injects the [`User`]
//! into request extensions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get, middleware::from_fn_with_state};
//! use lib_web::{handlers, middleware::require_auth, AppState};
//!
//! fn protected(state: AppState) -> Router<AppState> {
//!     Router::new()
//!         .route("/auth/me", get(handlers::auth::me))
//!         .route_layer(from_fn_with_state(state, require_auth))
//! }
//! ```
//!
//! Every failure (missing header, wrong scheme, bad token, unknown subject)
//! is the same `401` with `WWW-Authenticate: Bearer`.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use lib_core::{AppError, User};
use tracing::{debug, warn};

use crate::services::AuthService;

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Authentication middleware that resolves bearer tokens to users.
pub async fn require_auth(
    State(auth): State<AuthService>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        warn!("[AUTH] Missing or malformed Authorization header");
        AppError::Unauthenticated
    })?;

    let user: User = auth.resolve_identity(token).await.inspect_err(|e| {
        warn!("[AUTH] Identity resolution failed: {}", e);
    })?;

    debug!(username = %user.username, "[AUTH] Authenticated user");

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
