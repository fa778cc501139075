use serde::{Deserialize, Serialize};
use crate::utils::errors::AuthError;

///
/// The default cost of 10 matches what the upstream clients were issued with, so their
/// stored digests verify unchanged.
///
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct BCryptSettings {
    pub cost: u32,
}

impl Default for BCryptSettings {
    fn default() -> Self {
        Self { cost: 10 }
    }
}

pub fn validate(phc: &str, plain_text_secret: &str) -> Result<bool, AuthError> {
    bcrypt::verify(plain_text_secret, phc).map_err(AuthError::from)
}

impl BCryptSettings {
    pub fn hash_into_phc(&self, plain_text_secret: &str) -> Result<String, AuthError> {
        bcrypt::hash(plain_text_secret, self.cost).map_err(AuthError::from)
    }
}
