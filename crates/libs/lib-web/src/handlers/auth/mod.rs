//! # Authentication Handlers
//!
//! HTTP request handlers for the account endpoints.
//!
//! Status codes follow [`AppError::status_code`](lib_core::AppError::status_code):
//! signup conflicts are `400`, bad credentials and bad tokens are `401`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{Router, routing::post};
//! use lib_web::handlers::auth::{signup, login};
//! use lib_web::AppState;
//!
//! let app: Router<AppState> = Router::new()
//!     .route("/auth/signup", post(signup))
//!     .route("/auth/login", post(login));
//! ```

use axum::{
    extract::{Extension, Form, Json, State},
    http::StatusCode,
};
use lib_core::{
    dto::{LoginForm, SignupRequest, TokenResponse, UserInfo},
    Result, User,
};
use tracing::{info, instrument};

use crate::services::AuthService;

/// Signup handler - creates a new user account.
///
/// Returns `201 Created` with the public view of the new user.
#[instrument(skip_all, fields(username = %req.username))]
pub async fn signup(
    State(auth): State<AuthService>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserInfo>)> {
    info!("[SIGNUP] New user signup request");

    let user = auth
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login handler - exchanges form credentials for a bearer token.
///
/// Unknown usernames and wrong passwords produce the same `401` response.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(auth): State<AuthService>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>> {
    info!("[LOGIN] Login attempt");

    let token = auth.login(&form.username, &form.password).await?;

    Ok(Json(token))
}

/// Current-user handler. Runs behind [`require_auth`](crate::middleware::require_auth),
/// which resolves the live user from the bearer token.
pub async fn me(Extension(user): Extension<User>) -> Json<UserInfo> {
    Json(UserInfo::from(user))
}

#[cfg(test)]
mod tests;
