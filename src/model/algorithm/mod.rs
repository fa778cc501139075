pub mod argon;
pub mod bcrypt;

use std::str::FromStr;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use crate::utils::config::Configuration;
use crate::utils::errors::{ErrorCode, AuthError};

#[derive(Clone, Copy, Debug, Deserialize, Display, Serialize, PartialEq)]
pub enum Algorithm {
    Argon,
    BCrypt,
}

///
/// Validate if the plain_text_secret matches the hashed secret provided.
///
/// The algorithm is selected from the PHC string, not from the configuration, so
/// digests created under a previous configuration keep verifying after a rotation.
///
pub fn validate(plain_text_secret: &str, phc: &str) -> Result<bool, AuthError> {
    match select(phc)? {
        Algorithm::Argon  => argon::validate(phc, plain_text_secret),
        Algorithm::BCrypt => bcrypt::validate(phc, plain_text_secret),
    }
}

///
/// Parse the first part of the phc string and return the algorithm.
///
fn select(phc: &str) -> Result<Algorithm, AuthError> {
    let mut split = phc.split("$");
    split.next(); /* Skip first it's blank */

    match split.next() {
        Some(algorithm) => Algorithm::from_str(algorithm),
        None => Err(ErrorCode::InvalidPHCFormat.with_msg("The PHC is invalid, there's no algorithm")),
    }
}

impl FromStr for Algorithm {
    type Err = AuthError;

    fn from_str(input: &str) -> Result<Algorithm, Self::Err> {
        match input {
            "argon"    |
            "argon2i"  |
            "argon2d"  |
            "argon2id" => Ok(Algorithm::Argon),

            "bcrypt" |
            "2a" |
            "2b" |
            "2x" |
            "2y" => Ok(Algorithm::BCrypt),

            _ => Err(ErrorCode::UnknownAlgorithmVariant.with_msg(&format!("algorithm {} is un-handled", input))),
        }
    }
}

///
/// The configured one-way hasher used for passwords, MFA codes and reset codes alike.
///
/// Hashing is CPU-bound by design - callers run it via tokio::task::spawn_blocking.
///
#[derive(Clone, Debug)]
pub struct SecretHasher {
    algorithm: Algorithm,
    bcrypt: bcrypt::BCryptSettings,
    argon: argon::ArgonSettings,
}

impl SecretHasher {
    pub fn from_config(config: &Configuration) -> Result<Self, AuthError> {
        Ok(SecretHasher {
            algorithm: Algorithm::from_str(&config.hash_algorithm)?,
            bcrypt: bcrypt::BCryptSettings { cost: config.bcrypt_cost },
            argon: argon::ArgonSettings::default(),
        })
    }

    pub fn hash_into_phc(&self, plain_text_secret: &str) -> Result<String, AuthError> {
        match self.algorithm {
            Algorithm::Argon  => self.argon.hash_into_phc(plain_text_secret),
            Algorithm::BCrypt => self.bcrypt.hash_into_phc(plain_text_secret),
        }
    }
}

#[cfg(test)]
mod tests {
    // Note this useful idiom: importing names from outer (for mod tests) scope.
    use super::*;

    #[test]
    fn test_select_argon2id() -> Result<(), AuthError> {
        let phc = "$argon2id$v=19$m=16384,t=20,p=1$77QFGJMDLMwvR7+lYvuNtw$82Byd2enomP62Z01Wcb1g5+KApYhQygW6BEYCXnZj5A";
        assert_eq!(select(phc)?, Algorithm::Argon);
        Ok(())
    }

    #[test]
    fn test_select_bcrypt() -> Result<(), AuthError> {
        let phc = "$2b$04$ZGlmZmVyZW50IHNhbHRzIG.X9O2/.0f8tU8BMWMrTsTTmTCfW8Fm6S";
        assert_eq!(select(phc)?, Algorithm::BCrypt);
        Ok(())
    }

    #[test]
    fn test_select_rejects_garbage() {
        assert_eq!(select("not-a-phc").unwrap_err().error_code(), ErrorCode::InvalidPHCFormat);
        assert_eq!(select("$bogus$v=1$abc").unwrap_err().error_code(), ErrorCode::UnknownAlgorithmVariant);
    }
}
