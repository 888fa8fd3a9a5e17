//! Credential handling.
//!
//! Validates password changes and hashes credentials before they reach the store:
//! - confirmation must match the new password
//! - minimum length of [`MIN_PASSWORD_LENGTH`] characters
//! - Argon2id with a random salt for storage

use crate::user::error::ValidationError;
use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingError(String),

    #[error("Failed to verify password: {0}")]
    VerificationError(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}

/// Checks a new password and its optional confirmation.
///
/// The equality check runs first, so a mismatched short password reports
/// [`ValidationError::PasswordMismatch`].
pub fn validate_password_change(
    new_password: &str,
    confirm_password: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(confirm) = confirm_password {
        if confirm != new_password {
            return Err(ValidationError::PasswordMismatch);
        }
    }

    validate_password_length(new_password)
}

/// Minimum-length rule shared by signup and password changes
pub fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// One-way salted hashing of user credentials
pub trait CredentialHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, PasswordError>;

    /// `Ok(false)` means a well-formed hash that doesn't match.
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Argon2id implementation of [`CredentialHasher`]
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Build a hasher with explicit cost parameters (memory in KiB).
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingError(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::VerificationError(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationError(e.to_string())),
        }
    }
}
