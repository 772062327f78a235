//! **Argon2id** password hashing. Hashes are stored as PHC strings, so the
//! salt and parameters travel with the hash.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Invalid Argon2 parameters: {0}")]
    Params(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored hash is not a valid PHC string: {0}")]
    CorruptHash(String),
}

// ------------------------------------------------------------------
// Tunable parameters
// ------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    pub memory_cost: u32, // KiB
    pub time_cost: u32,   // iterations
    pub parallelism: u32, // lanes
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Params {
    fn instance(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash with a fresh random salt.
pub fn hash_password(password: &str, params: Argon2Params) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    params
        .instance()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify against a stored PHC string. The parameters embedded in the
/// string win over the defaults, so old hashes keep verifying.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|e| PasswordError::CorruptHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
