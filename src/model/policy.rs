use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use crate::model::{account::Account, algorithm};
use crate::utils::config::Configuration;
use crate::utils::errors::{ErrorCode, AuthError};

/// The punctuation set that satisfies the symbol rule.
pub const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

///
/// The password policy - complexity, expiry, reuse and the lockout/code limits.
///
/// Pure decision functions over caller-supplied inputs so they can be tested in
/// isolation. Built once from the service configuration.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PasswordPolicy {
    pub min_length: u32,
    pub max_length: u32,
    pub expiry_days: u32,
    pub history_depth: usize,
    pub max_failed_logins: u32,
    pub lockout_minutes: u32,
    pub mfa_code_minutes: u32,
    pub reset_code_minutes: u32,
    pub max_code_attempts: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        PasswordPolicy {
            min_length: 8,
            max_length: 64,
            expiry_days: 90,
            history_depth: 5,
            max_failed_logins: 10,
            lockout_minutes: 15,
            mfa_code_minutes: 5,
            reset_code_minutes: 10,
            max_code_attempts: 5,
        }
    }
}

impl PasswordPolicy {
    pub fn from_config(config: &Configuration) -> Self {
        PasswordPolicy {
            min_length: 8,
            max_length: 64,
            expiry_days: config.password_expiry_days,
            history_depth: config.password_history_depth as usize,
            max_failed_logins: config.max_failed_logins,
            lockout_minutes: config.lockout_minutes,
            mfa_code_minutes: config.mfa_code_minutes,
            reset_code_minutes: config.reset_code_minutes,
            max_code_attempts: config.max_code_attempts,
        }
    }

    ///
    /// Check the plain text password doesn't violate the complexity rules.
    ///
    /// The history of the password is not validated. This must be done seperately.
    ///
    pub fn validate_pattern(&self, plain_text_password: &str) -> Result<(), AuthError> {

        if plain_text_password.len() < self.min_length as usize {
            return Err(ErrorCode::PasswordTooShort
                .with_msg(&format!("passwords must be at least {} characters", self.min_length)))
        }

        if plain_text_password.len() > self.max_length as usize {
            return Err(ErrorCode::PasswordTooLong
                .with_msg(&format!("passwords may not be more than {} characters", self.max_length)))
        }

        if !plain_text_password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ErrorCode::MissingUppercase
                .with_msg("a password must contain at least one upper case letter"))
        }

        if !plain_text_password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(ErrorCode::MissingLowercase
                .with_msg("a password must contain at least one lower case letter"))
        }

        if !plain_text_password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ErrorCode::MissingNumber
                .with_msg("a password must contain at least one number"))
        }

        if !plain_text_password.chars().any(|c| SYMBOLS.contains(c)) {
            return Err(ErrorCode::MissingSymbol
                .with_msg(&format!("a password must contain at least one of {}", SYMBOLS)))
        }

        Ok(())
    }

    ///
    /// If the password hasn't been changed within the expiry period it can no longer be
    /// used to log in - the reset flow is the only way forward.
    ///
    pub fn expired(&self, changed_on: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // Compare full durations - partial days count, so the flip is at 90 days and
        // one second, not at 91 whole days.
        now - changed_on > Duration::days(self.expiry_days as i64)
    }

    ///
    /// Check the candidate against the current password hash AND the retained history -
    /// re-using the active password is a violation too.
    ///
    /// Hash verification is CPU-bound, callers should run this on the blocking pool.
    ///
    pub fn validate_history(&self, plain_text_password: &str, account: &Account) -> Result<(), AuthError> {
        for phc in std::iter::once(&account.phc).chain(account.history.iter()) {
            if algorithm::validate(plain_text_password, phc)? {
                return Err(ErrorCode::PasswordUsedBefore
                    .with_msg("the password has been used before, choose one that is new"))
            }
        }

        Ok(())
    }
}
