pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use crate::model::account::Account;
use crate::utils::errors::AuthError;

pub mod prelude {
    // Collection names.
    pub const ACCOUNTS: &str = "Accounts";

    // Field names.
    pub const ACCOUNT_ID: &str = "account_id";
    pub const EMAIL:      &str = "email";
}

///
/// The credential store consumed by every flow in this crate.
///
/// One implementation persists to MongoDB, another keeps documents in memory for tests
/// and local development. Saves are whole-document read-modify-write - the worst-case
/// race on the failure counters is bounded to one attempt and self-heals, so no
/// transactions are required.
///
#[async_trait]
pub trait CredentialStore: Send + Sync {
    ///
    /// Find an account by email. Callers must normalise the email first (see normalise_email).
    ///
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;

    async fn find_by_id(&self, account_id: &str) -> Result<Option<Account>, AuthError>;

    ///
    /// Create a new account - a duplicate email is reported as EmailInUse.
    ///
    async fn insert(&self, account: &Account) -> Result<(), AuthError>;

    ///
    /// Replace the stored document for this account_id.
    ///
    async fn save(&self, account: &Account) -> Result<(), AuthError>;
}

///
/// Emails are matched case-insensitively - normalise before storing or searching.
///
pub fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}
