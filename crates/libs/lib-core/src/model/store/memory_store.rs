//! # In-Memory User Store
//!
//! Process-local [`UserStore`] guarded by a single `RwLock`. Lookups share the
//! read lock; `create` holds the write lock across both uniqueness checks and
//! the insert.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::models::{User, UserForCreate};
use super::UserStore;
use crate::error::{AppError, Result};

#[derive(Default)]
struct Inner {
    /// Records keyed by username
    users: HashMap<String, User>,
    /// email -> username
    emails: HashMap<String, String>,
    last_id: i64,
}

/// [`UserStore`] kept entirely in memory. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: UserForCreate) -> Result<User> {
        let mut inner = self.inner.write().await;

        if inner.users.contains_key(&user.username) {
            return Err(AppError::UsernameConflict);
        }

        if inner.emails.contains_key(&user.email) {
            return Err(AppError::EmailConflict);
        }

        inner.last_id += 1;
        let record = User {
            id: inner.last_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: lib_utils::now_utc(),
        };

        inner
            .emails
            .insert(record.email.clone(), record.username.clone());
        inner.users.insert(record.username.clone(), record.clone());

        debug!(username = %record.username, id = record.id, "[STORE] Created user (memory)");

        Ok(record)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .emails
            .get(email)
            .and_then(|username| inner.users.get(username))
            .cloned())
    }
}
