//! # Data Transfer Objects (DTOs)
//!
//! Request and response bodies exchanged with HTTP clients.

pub mod auth;

pub use auth::*;
