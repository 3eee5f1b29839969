//! # User Repository
//!
//! SQL access layer for the `users` table and the durable [`UserStore`].
//!
//! ## Example
//!
//! ```rust,no_run
//! # use lib_core::model::store::{create_pool, ensure_schema, SqliteUserStore, UserForCreate, UserStore};
//! # async fn example() -> lib_core::Result<()> {
//! let pool = create_pool("sqlite::memory:").await?;
//! ensure_schema(&pool).await?;
//!
//! let store = SqliteUserStore::new(pool);
//! let user = store
//!     .create(UserForCreate::new("alice", "alice@example.com", "hashed_password"))
//!     .await?;
//!
//! let found = store.find_by_username("alice").await?;
//! assert_eq!(found, Some(user));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use sqlx::query_as;
use tracing::debug;

use super::models::{User, UserForCreate};
use super::{DbPool, UserStore};
use crate::error::{AppError, Result};

/// User repository for database operations.
pub struct UserRepository;

impl UserRepository {
    /// Find a user by their email address.
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
        let user = query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find a user by their username.
    pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
        let user = query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Insert a user row without pre-checks.
    ///
    /// # Errors
    ///
    /// - `UsernameConflict` / `EmailConflict` on a UNIQUE constraint violation
    /// - `Internal` if the database fails
    pub async fn insert(pool: &DbPool, user_data: &UserForCreate) -> Result<User> {
        let result =
            sqlx::query("INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)")
                .bind(&user_data.username)
                .bind(&user_data.email)
                .bind(&user_data.password_hash)
                .execute(pool)
                .await?;

        let id = result.last_insert_rowid();

        let user = query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Create a new user, reporting a taken username before a taken email.
    ///
    /// The pre-checks give the documented precedence; the UNIQUE constraints
    /// settle concurrent inserts that both pass them.
    pub async fn create(pool: &DbPool, user_data: &UserForCreate) -> Result<User> {
        if Self::find_by_username(pool, &user_data.username).await?.is_some() {
            return Err(AppError::UsernameConflict);
        }

        if Self::find_by_email(pool, &user_data.email).await?.is_some() {
            return Err(AppError::EmailConflict);
        }

        Self::insert(pool, user_data).await
    }

    /// Count all users.
    pub async fn count(pool: &DbPool) -> Result<i64> {
        let (count,): (i64,) = query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

/// Durable [`UserStore`] backed by SQLite.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: DbPool,
}

impl SqliteUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, user: UserForCreate) -> Result<User> {
        debug!(username = %user.username, "[STORE] Creating user (sqlite)");
        UserRepository::create(&self.pool, &user).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        UserRepository::find_by_username(&self.pool, username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        UserRepository::find_by_email(&self.pool, email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::{create_pool, ensure_schema};
    use std::sync::Arc;

    const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

    /// Create an in-memory SQLite database for testing
    async fn setup_test_db() -> DbPool {
        let pool = create_pool("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        ensure_schema(&pool)
            .await
            .expect("Failed to create users table");
        pool
    }

    // ========== User Creation Tests ==========

    #[tokio::test]
    async fn test_create_user() {
        let store = SqliteUserStore::new(setup_test_db().await);

        let user = store
            .create(UserForCreate::new("testuser", "test@example.com", HASH))
            .await
            .unwrap();

        assert_eq!(user.username, "testuser");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.password_hash, HASH);
        assert!(user.id > 0);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let store = SqliteUserStore::new(setup_test_db().await);

        store
            .create(UserForCreate::new("alice", "a@x.com", HASH))
            .await
            .unwrap();

        let result = store
            .create(UserForCreate::new("alice", "b@y.com", HASH))
            .await;

        assert_eq!(result, Err(AppError::UsernameConflict));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let store = SqliteUserStore::new(setup_test_db().await);

        store
            .create(UserForCreate::new("alice", "a@x.com", HASH))
            .await
            .unwrap();

        let result = store.create(UserForCreate::new("bob", "a@x.com", HASH)).await;

        assert_eq!(result, Err(AppError::EmailConflict));
    }

    #[tokio::test]
    async fn test_username_conflict_reported_first() {
        let store = SqliteUserStore::new(setup_test_db().await);

        store
            .create(UserForCreate::new("alice", "a@x.com", HASH))
            .await
            .unwrap();

        let result = store
            .create(UserForCreate::new("alice", "a@x.com", HASH))
            .await;

        assert_eq!(result, Err(AppError::UsernameConflict));
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_conflict() {
        let pool = setup_test_db().await;

        UserRepository::insert(&pool, &UserForCreate::new("alice", "a@x.com", HASH))
            .await
            .unwrap();

        let same_name =
            UserRepository::insert(&pool, &UserForCreate::new("alice", "b@y.com", HASH)).await;
        assert_eq!(same_name, Err(AppError::UsernameConflict));

        let same_email =
            UserRepository::insert(&pool, &UserForCreate::new("bob", "a@x.com", HASH)).await;
        assert_eq!(same_email, Err(AppError::EmailConflict));

        assert_eq!(UserRepository::count(&pool).await.unwrap(), 1);
    }

    // ========== User Retrieval Tests ==========

    #[tokio::test]
    async fn test_find_by_username() {
        let store = SqliteUserStore::new(setup_test_db().await);

        let created = store
            .create(UserForCreate::new("testuser", "test@example.com", HASH))
            .await
            .unwrap();

        let found = store.find_by_username("testuser").await.unwrap();

        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_by_username_not_found() {
        let store = SqliteUserStore::new(setup_test_db().await);

        let found = store.find_by_username("nonexistent").await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let store = SqliteUserStore::new(setup_test_db().await);

        store
            .create(UserForCreate::new("testuser", "test@example.com", HASH))
            .await
            .unwrap();

        let found = store.find_by_email("test@example.com").await.unwrap();

        assert_eq!(
            found.expect("User should exist after creation").username,
            "testuser"
        );
        assert!(store.find_by_email("other@example.com").await.unwrap().is_none());
    }

    // ========== Concurrency Tests ==========

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_same_username() {
        let pool = setup_test_db().await;
        let store = Arc::new(SqliteUserStore::new(pool.clone()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create(UserForCreate::new("racer", format!("racer{i}@example.com"), HASH))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => assert_eq!(err, AppError::UsernameConflict),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(UserRepository::count(&pool).await.unwrap(), 1);
    }
}
