//! Password policy and Argon2id hashing.
//!
//! Hashing and verification are CPU-heavy; async callers run them through
//! `tokio::task::spawn_blocking`.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::SecurityConfig;

pub const MIN_PASSWORD_LEN: usize = 7;

/// Checks the registration password rules.
///
/// Returns the reason the password is rejected, if any.
#[must_use]
pub fn password_policy_violation(password: &str) -> Option<&'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 7 characters");
    }

    if password.to_lowercase().contains("password") {
        return Some("Password must not contain the word \"password\"");
    }

    None
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Compares a plaintext password against a stored PHC hash string.
///
/// The cost parameters are read back from the hash itself, so hashes created
/// under older settings keep verifying.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
