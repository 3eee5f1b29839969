//! # Password Hashing
//!
//! Password hashing and verification using Argon2.
//!
//! Plaintext is truncated to [`MAX_PASSWORD_BYTES`] before hashing and before
//! verification, so bytes past the limit never distinguish two passwords.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Longest plaintext prefix, in bytes, that takes part in hashing.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Password hashing error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Cut `password` to at most [`MAX_PASSWORD_BYTES`], backing off to a char boundary.
pub fn truncate_password(password: &str) -> &str {
    if password.len() <= MAX_PASSWORD_BYTES {
        return password;
    }

    let mut end = MAX_PASSWORD_BYTES;
    while !password.is_char_boundary(end) {
        end -= 1;
    }
    &password[..end]
}

/// Hash a password using the Argon2 algorithm with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(truncate_password(password).as_bytes(), &salt)
        .map_err(|e| Error::Hash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a plaintext password against an Argon2 hash.
///
/// A digest that does not parse is treated as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(truncate_password(password).as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "TestPassword123!";
        let hash = hash_password(password)
            .expect("Password hashing should succeed for valid password");

        assert!(verify_password(password, &hash));
        assert!(!verify_password("WrongPassword", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let password = "SamePassword";
        let first = hash_password(password).unwrap();
        let second = hash_password(password).unwrap();

        assert_ne!(first, second);
        assert_ne!(first, password);
        assert!(verify_password(password, &first));
        assert!(verify_password(password, &second));
    }

    #[test]
    fn test_bytes_past_limit_do_not_distinguish() {
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = hash_password(&format!("{prefix}tail-one")).unwrap();

        assert!(verify_password(&format!("{prefix}tail-two"), &hash));
        assert!(verify_password(&prefix, &hash));
        assert!(!verify_password(&prefix[..MAX_PASSWORD_BYTES - 1], &hash));
    }

    #[test]
    fn test_truncate_backs_off_to_char_boundary() {
        // 71 ASCII bytes followed by a 2-byte char straddling the limit
        let password = format!("{}é", "a".repeat(MAX_PASSWORD_BYTES - 1));
        let truncated = truncate_password(&password);

        assert_eq!(truncated.len(), MAX_PASSWORD_BYTES - 1);
        assert_eq!(truncate_password("short"), "short");
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "$argon2id$v=19$broken"));
    }
}
