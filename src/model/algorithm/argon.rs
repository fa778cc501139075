use rand_core::OsRng;
use std::convert::TryFrom;
use serde::{Deserialize, Serialize};
use crate::utils::errors::AuthError;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ArgonSettings {
    pub parallelism: u32,
    pub memory_size_kb: u32,
    pub iterations: u32,
    pub version: u32,
}

pub fn validate(phc: &str, plain_text_secret: &str) -> Result<bool, AuthError> {
    let parsed_hash = argon2::PasswordHash::new(phc)?;
    match argon2::PasswordVerifier::verify_password(&argon2::Argon2::default(), plain_text_secret.as_bytes(), &parsed_hash) {
        Ok(_)  => Ok(true),
        Err(_) => Ok(false),
    }
}

impl Default for ArgonSettings {
    fn default() -> Self {
        ArgonSettings {
            parallelism: 1,
            memory_size_kb: 1024 * 16,
            iterations: 1,
            version: 19,
        }
    }
}

impl ArgonSettings {
    pub fn hash_into_phc(&self, plain_text_secret: &str) -> Result<String, AuthError> {
        let secret = plain_text_secret.as_bytes();
        let salt = argon2::password_hash::SaltString::generate(&mut OsRng);

        let params = argon2::Params::new(self.memory_size_kb, self.iterations, self.parallelism, None)?;
        let argon2 = argon2::Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::try_from(self.version)?,
            params);

        // Hash into a PHC string ($argon2id$v=19$...)
        Ok(argon2::PasswordHasher::hash_password(&argon2, secret, &salt)?.to_string())
    }
}
