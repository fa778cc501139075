pub mod memory;

#[cfg(feature = "kafka")]
pub mod kafka;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use crate::utils::errors::AuthError;

///
/// What an issued one-time code is for - carried on the notification so the mailer can
/// pick the right template.
///
#[derive(Clone, Copy, Debug, Deserialize, Display, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodePurpose {
    Mfa,
    Reset,
}

///
/// Delivers one-time codes to the user out-of-band.
///
/// Treated as best-effort everywhere: the account state is persisted before a send is
/// attempted and a failure is logged, never propagated - a fresh code can always be
/// requested.
///
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send_code(&self, destination: &str, code: &str, purpose: CodePurpose, expires_at: DateTime<Utc>) -> Result<(), AuthError>;
}

///
/// The fallback channel when no Kafka producer is configured - drops the code and logs
/// that it did so. Only of use in development.
///
pub struct DiscardChannel;

#[async_trait]
impl NotificationChannel for DiscardChannel {
    async fn send_code(&self, destination: &str, _code: &str, purpose: CodePurpose, _expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        tracing::debug!("Discarding {} code for {} - no notification channel configured", purpose, destination);
        Ok(())
    }
}
