use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// The role embedded in the account and in issued session tokens.
///
#[derive(Clone, Copy, Debug, Deserialize, Display, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

///
/// One document per account in the Accounts collection.
///
/// Accounts are never hard-deleted by this core. The email is stored lowercase so
/// look-ups are case-insensitive. None of the code/hash fields ever hold a clear-text
/// secret - everything goes through the hashing algorithms in model::algorithm.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Account {
    pub account_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,

    /// Current password digest as a PHC string.
    pub phc: String,

    /// Prior password digests, most-recent-last, bounded by the configured history depth.
    #[serde(default)]
    pub history: Vec<String>,

    /// When the current password was set - drives the expiry check.
    pub changed_on: bson::DateTime,

    /// Consecutive wrong-password attempts. Reset to zero on any successful step-1 login.
    #[serde(default)]
    pub failed_attempts: u32,

    /// While this is in the future, login is refused regardless of password correctness.
    pub lock_until: Option<bson::DateTime>,

    pub mfa_code: Option<String>,
    pub mfa_code_expires: Option<bson::DateTime>,
    #[serde(default)]
    pub mfa_attempts: u32,

    pub reset_code: Option<String>,
    pub reset_code_expires: Option<bson::DateTime>,
    #[serde(default)]
    pub reset_attempts: u32,

    /// Set when a reset code is verified - authorises the completing call until it lapses.
    pub reset_verified_until: Option<bson::DateTime>,

    /// The jti claims of refresh tokens that are still honoured. Removal is revocation.
    #[serde(default)]
    pub refresh_tokens: Vec<String>,
}

impl Account {
    pub fn new(account_id: String, email: String, display_name: String, phc: String, changed_on: bson::DateTime) -> Self {
        Account {
            account_id,
            email,
            display_name,
            role: Role::User,
            phc,
            history: vec![],
            changed_on,
            failed_attempts: 0,
            lock_until: None,
            mfa_code: None,
            mfa_code_expires: None,
            mfa_attempts: 0,
            reset_code: None,
            reset_code_expires: None,
            reset_attempts: 0,
            reset_verified_until: None,
            refresh_tokens: vec![],
        }
    }
}

///
/// The sanitised view of an account handed back to callers - no hashes, no codes.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Identity {
    pub account_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl From<&Account> for Identity {
    fn from(account: &Account) -> Self {
        Identity {
            account_id: account.account_id.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            role: account.role,
        }
    }
}
