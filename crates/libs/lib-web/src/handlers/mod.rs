//! # HTTP Request Handlers
//!
//! Axum handlers, thin wrappers that delegate to [`crate::services`].
//!
//! - **[`auth`]**: account endpoints
//!   - `POST /auth/signup` - Create a new account
//!   - `POST /auth/login` - Exchange username/password for a bearer token
//!   - `GET /auth/me` - Current user for the presented bearer token

pub mod auth;
