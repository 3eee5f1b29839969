//! # Bearer Token Management
//!
//! Signed, self-contained access tokens (HS256 JWT) carrying the username and
//! an absolute expiry.
//!
//! Verification reports every failure (bad structure, bad signature, expiry,
//! missing subject) as the same [`Error::Rejected`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lib_utils::{from_unix, now_utc, unix_now};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The token cannot be trusted. Deliberately carries no reason.
    #[error("Token rejected")]
    Rejected,

    #[error("Failed to sign token: {0}")]
    Sign(String),
}

/// Claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        from_unix(self.exp).ok()
    }
}

/// Issues and verifies access tokens with a process-wide shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec signing with `secret` and issuing tokens valid for `default_ttl`.
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        }
    }

    /// Lifetime applied by [`TokenCodec::issue_default`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` expiring `ttl` from now.
    ///
    /// A negative `ttl` yields a token that is already expired.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, Error> {
        let now = now_utc();
        let exp = now + ttl;

        let claims = Claims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Sign(e.to_string()))
    }

    /// Issue a token for `subject` with the default lifetime.
    pub fn issue_default(&self, subject: &str) -> Result<String, Error> {
        self.issue(subject, self.default_ttl)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| Error::Rejected)?
            .claims;

        // the library accepts exp == now; expiry must be strictly in the future
        if claims.exp <= unix_now() || claims.sub.is_empty() {
            return Err(Error::Rejected);
        }

        Ok(claims)
    }
}
