//! # Web Library
//!
//! Auth service, HTTP handlers, middleware, and server wiring.

pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{create_router, start_server, AppState, ServerConfig};
pub use services::AuthService;
