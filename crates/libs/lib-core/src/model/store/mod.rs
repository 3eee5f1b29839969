//! # Credential Store
//!
//! The [`UserStore`] trait and its implementations:
//!
//! - [`SqliteUserStore`]: durable store backed by the `users` table
//! - [`MemoryUserStore`]: process-local store for tests and development
//!
//! `create` checks username and email uniqueness and inserts as one atomic
//! unit. The username is checked first, so a request colliding on both only
//! reports [`AppError::UsernameConflict`](crate::AppError::UsernameConflict).

// region: --- Modules
pub mod memory_store;
pub mod models;
pub mod user_repository;
// endregion: --- Modules

// region: --- Re-exports
pub use memory_store::MemoryUserStore;
pub use models::{User, UserForCreate};
pub use user_repository::{SqliteUserStore, UserRepository};
// endregion: --- Re-exports

// region: --- Types and Functions
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::error::Result;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Schema of the `users` table.
const USERS_SCHEMA: &str = include_str!("../../../migrations/0001_create_users.sql");

/// Storage contract the auth service depends on.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, failing with a conflict if the username or email is taken.
    async fn create(&self, user: UserForCreate) -> Result<User>;

    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Create a new SQLite connection pool, creating the database file if missing.
///
/// An in-memory URL gets a single connection that is never recycled, since
/// every SQLite connection to `:memory:` opens its own empty database.
pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new();
    if database_url.contains(":memory:") {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}

/// Create the `users` table if it does not exist.
pub async fn ensure_schema(pool: &DbPool) -> Result<()> {
    sqlx::raw_sql(USERS_SCHEMA).execute(pool).await?;
    Ok(())
}
// endregion: --- Types and Functions
