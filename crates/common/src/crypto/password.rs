//! Salted one-way password hashing.
//!
//! Account passwords and per-image passwords go through the same scheme:
//! argon2 with a random salt, stored as a PHC string. Plaintext
//! comparison is never performed anywhere in the service.
//!
//! Hashing is CPU-bound, so the async entry points offload to a blocking
//! worker rather than stalling the executor.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to compute password hash: {0}")]
    Hash(String),

    #[error("stored password hash is not a valid PHC string: {0}")]
    MalformedHash(String),

    #[error("hashing task failed to complete")]
    TaskFailed,
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_sync(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC string.
///
/// A mismatch is an `Ok(false)`, never an error. Errors are reserved
/// for malformed stored hashes and hashing-infrastructure failures.
pub fn verify_sync(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e.to_string())),
    }
}

/// Hash on a blocking worker.
pub async fn hash(plain: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_sync(&plain))
        .await
        .map_err(|_| PasswordError::TaskFailed)?
}

/// Verify on a blocking worker.
pub async fn verify(plain: String, stored: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_sync(&plain, &stored))
        .await
        .map_err(|_| PasswordError::TaskFailed)?
}
