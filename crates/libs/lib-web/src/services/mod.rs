//! # Services Layer
//!
//! Business logic sitting between HTTP handlers and the data layer:
//!
//! ```text
//! Handlers (HTTP) → Services (Business Logic) → UserStore / lib-auth
//! ```
//!
//! - [`auth`] - Registration, login, and identity resolution

pub mod auth;

pub use auth::AuthService;
