//! # Core Library
//!
//! Configuration, the application error type, user models, credential stores, and DTOs.

pub mod config;
pub mod dto;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::{Config, StoreKind};
pub use error::{AppError, Result};
pub use model::store::{
    create_pool, ensure_schema, DbPool, MemoryUserStore, SqliteUserStore, User, UserForCreate,
    UserStore,
};
