//! Password hashing, verification and validation.
//!
//! Two schemes share the `users.password` column. `Sha256` is the
//! unsalted hex digest existing stores were written with; `Argon2` writes
//! salted PHC strings. Verification recognises either form from the stored
//! value itself, so a store can switch schemes without rewriting old rows.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{MindscanError, Result};

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const ARGON2_PREFIX: &str = "$argon2";

/// Scheme used when hashing new passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordScheme {
    /// Lowercase hex SHA-256 of the UTF-8 password
    #[default]
    Sha256,
    /// Argon2id PHC string with a random salt
    Argon2,
}

/// Lowercase hex SHA-256 digest of `password`.
pub fn sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Hash a password for storage.
///
/// # Errors
///
/// Returns `MindscanError::Credentials` if Argon2 hashing fails.
pub fn hash_password(password: &str, scheme: PasswordScheme) -> Result<String> {
    match scheme {
        PasswordScheme::Sha256 => Ok(sha256_hex(password)),
        PasswordScheme::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| MindscanError::Credentials(format!("Argon2 hashing failed: {}", e)))
        }
    }
}

/// Check `password` against a stored hash of either scheme.
///
/// Digest comparison is constant-time; a malformed stored value never
/// matches.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if stored.starts_with(ARGON2_PREFIX) {
        return match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        };
    }

    let candidate = sha256_hex(password);
    candidate.as_bytes().ct_eq(stored.as_bytes()).into()
}

/// Validate a password chosen at signup.
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(MindscanError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(MindscanError::InvalidInput(format!(
            "Password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH, length
        )));
    }

    Ok(())
}

/// Validate a username chosen at signup.
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(MindscanError::InvalidInput(
            "Username cannot be empty".to_string(),
        ));
    }
    Ok(())
}
