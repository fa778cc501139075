use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use crate::db::CredentialStore;
use crate::model::algorithm::SecretHasher;
use crate::model::policy::PasswordPolicy;
use crate::notify::{CodePurpose, NotificationChannel};
use crate::token::TokenIssuer;
use crate::utils::config::Configuration;
use crate::utils::errors::AuthError;

///
/// The context is available to every service operation and gives it access to the
/// credential store, notification channel, policy, hasher, token issuer and clock.
///
/// The clock is the wall clock unless a test has pinned it. Expiries and lockouts are
/// all lazy comparisons against ctx.now(), so pinning the clock lets tests travel
/// through time instead of sleeping.
///
pub struct ServiceContext {
    config: Configuration,
    policy: PasswordPolicy,
    hasher: SecretHasher,
    tokens: TokenIssuer,
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn NotificationChannel>,
    fixed_time: RwLock<Option<DateTime<Utc>>>,
}

impl ServiceContext {
    pub fn new(config: Configuration, store: Arc<dyn CredentialStore>, notifier: Arc<dyn NotificationChannel>)
        -> Result<Self, AuthError> {

        Ok(ServiceContext {
            policy: PasswordPolicy::from_config(&config),
            hasher: SecretHasher::from_config(&config)?,
            tokens: TokenIssuer::from_config(&config),
            store,
            notifier,
            fixed_time: RwLock::new(None),
            config,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    pub fn hasher(&self) -> &SecretHasher {
        &self.hasher
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn store(&self) -> &dyn CredentialStore {
        &*self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        match *self.fixed_time.read() {
            Some(fixed) => fixed,
            None => Utc::now(),
        }
    }

    ///
    /// Pin the clock to a fixed time, or release it back to the wall clock with None.
    ///
    pub fn set_now(&self, now: Option<DateTime<Utc>>) {
        *self.fixed_time.write() = now;
    }

    ///
    /// Dispatch a one-time code out-of-band. Best-effort: the account state carrying
    /// the code's hash has already been persisted, so a delivery failure is logged and
    /// swallowed - the user can always request a fresh code.
    ///
    pub async fn send_code(&self, destination: &str, code: &str, purpose: CodePurpose, expires_at: DateTime<Utc>) {
        if let Err(err) = self.notifier.send_code(destination, code, purpose, expires_at).await {
            tracing::warn!("Failed to dispatch {} code to {}: {:?}", purpose, destination, err);
        }
    }
}
