use argon2::password_hash::{self, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::RngCore;

use crate::config::AuthConfig;
use crate::talent::ServiceError;

/// Argon2id hashing with a configurable memory and iteration cost.
#[derive(Debug, Clone)]
pub struct Passwords {
    params: Params,
}

impl Passwords {
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, ServiceError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|err| ServiceError::Password(err.to_string()))?;
        Ok(Self { params })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, ServiceError> {
        Self::new(config.password_memory_kib, config.password_iterations)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Returns a PHC string embedding the salt and cost parameters.
    pub fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt =
            SaltString::encode_b64(&salt).map_err(|err| ServiceError::Password(err.to_string()))?;

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| ServiceError::Password(err.to_string()))
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, ServiceError> {
        let parsed = PasswordHash::new(hash).map_err(|err| ServiceError::Password(err.to_string()))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(ServiceError::Password(err.to_string())),
        }
    }
}
