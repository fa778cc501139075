use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::notify::CodePurpose;

///
/// A notification published when a one-time code (MFA or reset) is issued.
///
/// The mailer service consumes these and delivers the code to the destination
/// out-of-band. The code is only ever stored hashed - this event is the single
/// place the clear value leaves the process.
///
#[derive(Debug, Deserialize, Serialize)]
pub struct CodeIssued {
    pub destination: String,
    pub code: String,
    pub purpose: CodePurpose,
    pub expires_at: DateTime<Utc>,
}
