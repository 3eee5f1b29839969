//! # Auth Service
//!
//! Orchestrates the credential-and-token lifecycle:
//!
//! - **register**: validate → reject taken username → reject taken email → hash → store
//! - **login**: look up → verify password → issue token
//! - **resolve_identity**: verify token → re-read the live user from the store
//!
//! Every operation returns [`AppError`]. Login failures are always
//! [`AppError::InvalidCredentials`] and identity failures always
//! [`AppError::Unauthenticated`], whatever the underlying cause.

use lib_auth::{hash_password, verify_password, TokenCodec};
use lib_core::{
    dto::{TokenResponse, UserInfo},
    AppError, Config, Result, User, UserForCreate, UserStore,
};
use lib_utils::{normalize_email, validate_email, validate_max_length, validate_not_empty};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, instrument, warn};

/// Column widths of the `users` table.
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EMAIL_LEN: usize = 255;

/// Digest verified against when the username is unknown, so that path costs
/// the same as a wrong password.
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| {
        hash_password("timing-equaliser-not-a-real-password").unwrap_or_default()
    })
}

/// Registration, login, and identity resolution over an injected store.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenCodec) -> Self {
        Self { store, tokens }
    }

    /// Build a service whose token codec uses the configured secret and lifetime.
    pub fn from_config(store: Arc<dyn UserStore>, config: &Config) -> Self {
        Self::new(store, TokenCodec::new(&config.secret_key, config.token_ttl()))
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Register a new user and return its public view.
    #[instrument(skip_all, fields(username = %username, email = %email))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserInfo> {
        validate_registration(username, email, password)?;
        let email = normalize_email(email);
        let email = email.as_str();

        if self.store.find_by_username(username).await?.is_some() {
            warn!("[SIGNUP] Username already registered");
            return Err(AppError::UsernameConflict);
        }

        if self.store.find_by_email(email).await?.is_some() {
            warn!("[SIGNUP] Email already registered");
            return Err(AppError::EmailConflict);
        }

        debug!("[SIGNUP] Hashing password...");
        let password_hash = hash_blocking(password.to_string()).await?;

        // the store re-checks both constraints atomically
        let user = self
            .store
            .create(UserForCreate::new(username, email, password_hash))
            .await
            .inspect_err(|e| warn!("[SIGNUP] Create failed: {}", e))?;

        info!(user_id = user.id, "[SIGNUP] New user signed up");

        Ok(UserInfo::from(user))
    }

    /// Verify credentials and issue a bearer token.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let user = self.store.find_by_username(username).await?;
        let known = user.is_some();

        let is_valid =
            verify_blocking(password.to_string(), user.map(|u| u.password_hash)).await?;

        if !known || !is_valid {
            warn!("[LOGIN] Invalid credentials");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue_default(username)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        info!("[LOGIN] User logged in");

        Ok(TokenResponse::bearer(token))
    }

    /// Resolve a bearer token to the live user record.
    pub async fn resolve_identity(&self, token: &str) -> Result<User> {
        let claims = self.tokens.verify(token).map_err(|_| {
            debug!("[AUTH] Token rejected");
            AppError::Unauthenticated
        })?;

        match self.store.find_by_username(&claims.sub).await? {
            Some(user) => Ok(user),
            None => {
                debug!(subject = %claims.sub, "[AUTH] Token subject no longer exists");
                Err(AppError::Unauthenticated)
            }
        }
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<()> {
    validate_not_empty(username, "Username")
        .and_then(|_| validate_max_length(username, MAX_USERNAME_LEN, "Username"))
        .and_then(|_| validate_email(email))
        .and_then(|_| validate_max_length(email, MAX_EMAIL_LEN, "Email"))
        .and_then(|_| validate_not_empty(password, "Password"))
        .map_err(AppError::InvalidInput)
}

/// Hash on the blocking pool; Argon2 is CPU-bound.
async fn hash_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {e}")))?
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Verify on the blocking pool. `None` verifies against the dummy digest.
async fn verify_blocking(password: String, hash: Option<String>) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        // a closure, not the fn item, so the borrow of `hash` need not be 'static
        let hash = hash.as_deref().unwrap_or_else(|| dummy_hash());
        verify_password(&password, hash)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Verification task failed: {e}")))
}
