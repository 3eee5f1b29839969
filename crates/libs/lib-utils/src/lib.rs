//! # Utilities Library
//!
//! Shared helpers for environment variables, time, and input validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse_or};
pub use time::{from_unix, now_utc, unix_now};
pub use validation::{normalize_email, validate_email, validate_max_length, validate_not_empty};
