//! # Application Configuration
//!
//! Configuration loaded from environment variables and validated on startup so a
//! misconfigured process fails fast instead of running with unsafe defaults.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `AUTH_SECRET_KEY` | *required* | Token signing secret, at least 32 characters |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | `60` | Access token lifetime |
//! | `USER_STORE` | `sqlite` | `sqlite` or `memory` |
//! | `DATABASE_URL` | `sqlite:app.db` | SQLite connection URL |

use chrono::Duration;
use lib_utils::{get_env, get_env_or, get_env_parse_or};
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Minimum accepted length of the signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Secret values that must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &["placeholder_secret_key", "changeme", "secret"];

/// Access token lifetime when `ACCESS_TOKEN_EXPIRE_MINUTES` is unset.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Longest accepted token lifetime (30 days).
const MAX_TOKEN_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Which credential store backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

impl FromStr for StoreKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "memory" => Ok(StoreKind::Memory),
            other => Err(AppError::Config(format!(
                "USER_STORE must be 'sqlite' or 'memory', got '{other}'"
            ))),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Credential store backend
    pub user_store: StoreKind,

    /// Secret key for access token signing and verification
    ///
    /// **Must be at least 32 characters long** and not a known placeholder.
    pub secret_key: String,

    /// Access token validity period in minutes
    pub token_ttl_minutes: i64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("user_store", &self.user_store)
            .field("secret_key", &"***REDACTED***")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing `AUTH_SECRET_KEY` is an error; there is no fallback secret.
    pub fn from_env() -> Result<Self> {
        let secret_key =
            get_env("AUTH_SECRET_KEY").map_err(|e| AppError::Config(e.to_string()))?;

        let token_ttl_minutes =
            get_env_parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)
                .map_err(|e| AppError::Config(e.to_string()))?;

        let user_store = get_env_or("USER_STORE", "sqlite").parse()?;
        let database_url = get_env_or("DATABASE_URL", "sqlite:app.db");

        Ok(Self {
            database_url,
            user_store,
            secret_key,
            token_ttl_minutes,
        })
    }

    /// Load and validate in one step.
    pub fn load() -> Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values against security rules.
    pub fn validate(&self) -> Result<()> {
        if PLACEHOLDER_SECRETS.contains(&self.secret_key.as_str()) {
            return Err(AppError::Config(
                "AUTH_SECRET_KEY is a placeholder value; set a high-entropy secret".to_string(),
            ));
        }

        if self.secret_key.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "AUTH_SECRET_KEY must be at least {MIN_SECRET_LEN} characters long"
            )));
        }

        if self.token_ttl_minutes < 1 || self.token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(AppError::Config(format!(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}"
            )));
        }

        Ok(())
    }

    /// Access token lifetime.
    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(self.token_ttl_minutes)
    }
}
