use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use super::{CodePurpose, NotificationChannel};
use crate::utils::errors::{ErrorCode, AuthError};

#[derive(Clone, Debug)]
pub struct SentCode {
    pub destination: String,
    pub code: String,
    pub purpose: CodePurpose,
    pub expires_at: DateTime<Utc>,
}

///
/// A capture channel for tests - records every code instead of delivering it, and can
/// be told to fail so the persisted-before-notified ordering can be exercised.
///
#[derive(Default)]
pub struct MemoryChannel {
    sent: Mutex<Vec<SentCode>>,
    failing: Mutex<bool>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    ///
    /// The most recent code captured for the destination, if any.
    ///
    pub fn last_code_for(&self, destination: &str) -> Option<SentCode> {
        self.sent.lock().iter().rev().find(|s| s.destination == destination).cloned()
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    async fn send_code(&self, destination: &str, code: &str, purpose: CodePurpose, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        if *self.failing.lock() {
            return Err(ErrorCode::NotificationFailed.with_msg("the notification channel is down"))
        }

        self.sent.lock().push(SentCode {
            destination: destination.to_string(),
            code: code.to_string(),
            purpose,
            expires_at,
        });

        Ok(())
    }
}
