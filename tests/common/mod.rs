#![allow(dead_code)]

use std::sync::Arc;
use chrono::{DateTime, Utc};
use gatehouse::db::memory::MemoryCredentialStore;
use gatehouse::model::account::Identity;
use gatehouse::notify::memory::MemoryChannel;
use gatehouse::services::{self, LoginRequest, RegisterRequest, VerifyMfaRequest, VerifyMfaResponse};
use gatehouse::utils::config::Configuration;
use gatehouse::utils::context::ServiceContext;

pub const PASSWORD: &str = "W!bble123";

///
/// Everything a test needs: the service context plus direct handles to the in-memory
/// store and capture channel so assertions can peek behind the operations.
///
/// Each test builds its own context so there is no shared state between tests.
///
pub struct TestContext {
    pub ctx: Arc<ServiceContext>,
    pub store: Arc<MemoryCredentialStore>,
    pub channel: Arc<MemoryChannel>,
}

pub fn start_gatehouse() -> TestContext {
    let store = Arc::new(MemoryCredentialStore::new());
    let channel = Arc::new(MemoryChannel::new());
    let ctx = ServiceContext::new(test_config(), store.clone(), channel.clone())
        .expect("unable to build a test service context");

    TestContext { ctx: Arc::new(ctx), store, channel }
}

fn test_config() -> Configuration {
    Configuration {
        db_name: "Gatehouse_Tests".to_string(),
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_credentials: None,
        kafka_servers: "localhost:29092".to_string(),
        kafka_timeout: 5000,
        token_secret: "test-secret".to_string(),
        access_token_minutes: 60,
        refresh_token_days: 7,
        password_expiry_days: 90,
        max_failed_logins: 10,
        lockout_minutes: 15,
        mfa_code_minutes: 5,
        reset_code_minutes: 10,
        max_code_attempts: 5,
        password_history_depth: 5,
        hash_algorithm: "bcrypt".to_string(),
        bcrypt_cost: 4, // The minimum cost - keeps the hashing in these tests quick.
    }
}

///
/// Set the clock to a fixed point in time, e.g. "2021-08-23T09:30:00Z".
///
pub fn set_time(time: &str, tc: &TestContext) {
    let time = DateTime::parse_from_rfc3339(time)
        .expect("test passed an invalid timestamp")
        .with_timezone(&Utc);
    tc.ctx.set_now(Some(time));
}

pub async fn register(email: &str, password: &str, tc: &TestContext) -> Identity {
    services::register(&tc.ctx, RegisterRequest {
            email: email.to_string(),
            display_name: "Test User".to_string(),
            password: password.to_string(),
        })
        .await
        .expect("unable to register the test account")
}

///
/// Run login step 1 and capture the one-time code from the channel.
///
pub async fn login_for_code(email: &str, password: &str, tc: &TestContext) -> String {
    let response = services::login(&tc.ctx, LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .expect("the test login was refused");
    assert!(response.mfa_required);

    tc.channel.last_code_for(email)
        .expect("no code was captured for the test login")
        .code
}

///
/// Complete both login steps and return the identity and token pair.
///
pub async fn authenticate(email: &str, password: &str, tc: &TestContext) -> VerifyMfaResponse {
    let code = login_for_code(email, password, tc).await;

    services::verify_mfa(&tc.ctx, VerifyMfaRequest {
            email: email.to_string(),
            code,
        })
        .await
        .expect("the test code was refused")
}
