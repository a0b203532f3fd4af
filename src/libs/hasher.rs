//! Argon2id hashing for passwords and security answers.

use super::config::HashingConfig;
use super::error::{TmsError, TmsResult};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::Rng;

const SALT_BYTES: usize = 16;

#[derive(Debug, Clone)]
pub struct SecretHasher {
    params: Params,
}

impl SecretHasher {
    pub fn new(config: &HashingConfig) -> TmsResult<Self> {
        let params = Params::new(config.memory_cost_kib, config.time_cost, config.parallelism, None)
            .map_err(|e| TmsError::Hashing(format!("invalid Argon2 params: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a secret into a salted PHC string.
    pub fn hash(&self, secret: &str) -> TmsResult<String> {
        let bytes: [u8; SALT_BYTES] = rand::rng().random();
        let salt = SaltString::encode_b64(&bytes).map_err(|e| TmsError::Hashing(e.to_string()))?;
        let hash = self
            .argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| TmsError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Compares a secret with a stored hash. A malformed hash never matches.
    pub fn verify(&self, secret: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self.argon2().verify_password(secret.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                tracing::warn!("Stored hash could not be parsed: {e}");
                false
            }
        }
    }
}
