use std::collections::HashMap;
use async_trait::async_trait;
use parking_lot::Mutex;
use super::CredentialStore;
use crate::model::account::Account;
use crate::utils::errors::{ErrorCode, AuthError};

///
/// An in-memory credential store keyed by account_id.
///
/// Used by the integration tests and handy for local development - it honours the same
/// contract as the Mongo store, including the duplicate-email failure on insert.
///
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Snapshot an account for white-box assertions in tests.
    ///
    pub fn snapshot(&self, email: &str) -> Option<Account> {
        self.accounts.lock().values().find(|a| a.email == email).cloned()
    }

    ///
    /// Drop an account - lets tests simulate an account deleted out-of-band.
    ///
    pub fn remove(&self, account_id: &str) {
        self.accounts.lock().remove(account_id);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.accounts.lock().values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, account_id: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.accounts.lock().get(account_id).cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), AuthError> {
        let mut lock = self.accounts.lock();

        if lock.values().any(|a| a.email == account.email) {
            return Err(ErrorCode::EmailInUse.with_msg("an account with that email already exists"))
        }

        lock.insert(account.account_id.clone(), account.clone());
        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), AuthError> {
        self.accounts.lock().insert(account.account_id.clone(), account.clone());
        Ok(())
    }
}
