pub mod guard;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use crate::model::account::{Account, Role};
use crate::utils::config::Configuration;
use crate::utils::errors::{ErrorCode, AuthError};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

///
/// An access/refresh pair as handed to the client after MFA verification.
///
/// The refresh jti is also persisted on the account - set membership there is the
/// revocation check, removal (logout) makes the refresh token dead on arrival.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires: i64,
    pub refresh_expires: i64,
    pub refresh_jti: String,
}

///
/// Creates and validates the signed, time-limited session tokens.
///
/// Expiry is checked against the caller-supplied clock rather than the library's, so
/// a test's pinned clock governs token lifetime like everything else.
///
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn from_config(config: &Configuration) -> Self {
        TokenIssuer {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_minutes),
            refresh_ttl: Duration::days(config.refresh_token_days),
        }
    }

    ///
    /// Issue a fresh access/refresh pair for the account.
    ///
    pub fn issue_pair(&self, account: &Account, now: DateTime<Utc>) -> Result<TokenPair, AuthError> {
        let (access_token, access_expires, _) = self.issue(account, TokenType::Access, now)?;
        let (refresh_token, refresh_expires, refresh_jti) = self.issue(account, TokenType::Refresh, now)?;

        Ok(TokenPair { access_token, refresh_token, access_expires, refresh_expires, refresh_jti })
    }

    ///
    /// Issue a single access token - used by the refresh operation.
    ///
    pub fn issue_access(&self, account: &Account, now: DateTime<Utc>) -> Result<(String, i64), AuthError> {
        let (token, expires, _) = self.issue(account, TokenType::Access, now)?;
        Ok((token, expires))
    }

    fn issue(&self, account: &Account, token_type: TokenType, now: DateTime<Utc>) -> Result<(String, i64, String), AuthError> {
        let ttl = match token_type {
            TokenType::Access  => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };

        let expires = (now + ttl).timestamp();
        let jti = crate::utils::generate_id();

        let claims = Claims {
            sub: account.account_id.clone(),
            email: account.email.clone(),
            role: account.role,
            token_type,
            iat: now.timestamp(),
            exp: expires,
            jti: jti.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, expires, jti))
    }

    ///
    /// Verify signature, expiry and token type, returning the claims.
    ///
    pub fn verify(&self, token: &str, expected: TokenType, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        // The exp claim is compared against the injected clock below, not the library's.
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(err) => {
                tracing::debug!("Rejected session token: {}", err);
                return Err(ErrorCode::TokenInvalid.with_msg("the token is not valid"))
            },
        };

        if claims.exp <= now.timestamp() {
            return Err(ErrorCode::TokenExpired.with_msg("the token has expired"))
        }

        if claims.token_type != expected {
            return Err(ErrorCode::TokenInvalid.with_msg("the token is not valid"))
        }

        Ok(claims)
    }
}
