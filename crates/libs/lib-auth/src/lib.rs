//! # Authentication Library
//!
//! Password hashing and signed bearer-token management.

pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use pwd::{hash_password, verify_password, MAX_PASSWORD_BYTES};
pub use token::{Claims, TokenCodec};
