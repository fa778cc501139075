mod common;

use gatehouse::services::{self, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, VerifyResetCodeRequest};
use gatehouse::utils::errors::ErrorCode;
use crate::common::{PASSWORD, TestContext, login_for_code, register, set_time, start_gatehouse};

const EMAIL: &str = "bob@example.com";

fn forgot_request(email: &str) -> ForgotPasswordRequest {
    ForgotPasswordRequest { email: email.to_string() }
}

fn verify_request(email: &str, code: &str) -> VerifyResetCodeRequest {
    VerifyResetCodeRequest { email: email.to_string(), code: code.to_string() }
}

fn reset_request(email: &str, password: &str) -> ResetPasswordRequest {
    ResetPasswordRequest { email: email.to_string(), password: password.to_string() }
}

///
/// Run the whole forgot/verify/reset flow for the account.
///
async fn reset_flow(email: &str, new_password: &str, tc: &TestContext) {
    services::forgot_password(&tc.ctx, forgot_request(email)).await.unwrap();
    let code = tc.channel.last_code_for(email).unwrap().code;
    services::verify_reset_code(&tc.ctx, verify_request(email, &code)).await.unwrap();
    services::reset_password(&tc.ctx, reset_request(email, new_password)).await.unwrap();
}


#[tokio::test]
async fn test_an_unknown_email_gets_the_same_silent_success() {
    let tc = start_gatehouse();

    // No account, no error and no code dispatched.
    services::forgot_password(&tc.ctx, forgot_request("nobody@example.com")).await.unwrap();
    assert_eq!(tc.channel.sent_count(), 0);
}


#[tokio::test]
async fn test_the_reset_flow_end_to_end() {
    let tc = start_gatehouse();
    register(EMAIL, PASSWORD, &tc).await;

    reset_flow(EMAIL, "N3w!Secret", &tc).await;

    // The old password is gone and the new one logs in.
    let err = services::login(&tc.ctx, LoginRequest { email: EMAIL.to_string(), password: PASSWORD.to_string() }).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidCredentials);
    login_for_code(EMAIL, "N3w!Secret", &tc).await;
}


#[tokio::test]
async fn test_a_wrong_reset_code_keeps_the_stored_code() {
    let tc = start_gatehouse();
    register(EMAIL, PASSWORD, &tc).await;

    services::forgot_password(&tc.ctx, forgot_request(EMAIL)).await.unwrap();
    let code = tc.channel.last_code_for(EMAIL).unwrap().code;
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let err = services::verify_reset_code(&tc.ctx, verify_request(EMAIL, wrong)).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidCode);

    // The genuine code still verifies.
    services::verify_reset_code(&tc.ctx, verify_request(EMAIL, &code)).await.unwrap();
}


#[tokio::test]
async fn test_the_reset_attempt_cap_discards_the_code() {
    let tc = start_gatehouse();
    register(EMAIL, PASSWORD, &tc).await;

    services::forgot_password(&tc.ctx, forgot_request(EMAIL)).await.unwrap();
    let code = tc.channel.last_code_for(EMAIL).unwrap().code;
    let wrong = if code == "000000" { "000001" } else { "000000" };

    for _ in 0..4 {
        let err = services::verify_reset_code(&tc.ctx, verify_request(EMAIL, wrong)).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidCode);
    }

    let err = services::verify_reset_code(&tc.ctx, verify_request(EMAIL, wrong)).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::CodeAttemptsExceeded);

    let err = services::verify_reset_code(&tc.ctx, verify_request(EMAIL, &code)).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidCode);
}


#[tokio::test]
async fn test_the_password_cannot_change_without_verification() {
    let tc = start_gatehouse();
    register(EMAIL, PASSWORD, &tc).await;

    // Requesting a code is not enough - it must be verified first.
    services::forgot_password(&tc.ctx, forgot_request(EMAIL)).await.unwrap();

    let err = services::reset_password(&tc.ctx, reset_request(EMAIL, "N3w!Secret")).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::ResetNotVerified);
}


#[tokio::test]
async fn test_the_verification_window_expires() {
    let tc = start_gatehouse();
    set_time("2021-08-23T09:30:00Z", &tc);
    register(EMAIL, PASSWORD, &tc).await;

    services::forgot_password(&tc.ctx, forgot_request(EMAIL)).await.unwrap();
    let code = tc.channel.last_code_for(EMAIL).unwrap().code;
    services::verify_reset_code(&tc.ctx, verify_request(EMAIL, &code)).await.unwrap();

    // Time-travel past the 10 minute window.
    set_time("2021-08-23T09:41:00Z", &tc);

    let err = services::reset_password(&tc.ctx, reset_request(EMAIL, "N3w!Secret")).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::ResetWindowExpired);
}


#[tokio::test]
async fn test_a_reset_code_cannot_be_verified_twice() {
    let tc = start_gatehouse();
    register(EMAIL, PASSWORD, &tc).await;

    services::forgot_password(&tc.ctx, forgot_request(EMAIL)).await.unwrap();
    let code = tc.channel.last_code_for(EMAIL).unwrap().code;

    services::verify_reset_code(&tc.ctx, verify_request(EMAIL, &code)).await.unwrap();
    let err = services::verify_reset_code(&tc.ctx, verify_request(EMAIL, &code)).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidCode);
}


#[tokio::test]
async fn test_password_reuse_is_rejected() {
    let tc = start_gatehouse();
    register(EMAIL, PASSWORD, &tc).await;

    // The active password counts as used.
    services::forgot_password(&tc.ctx, forgot_request(EMAIL)).await.unwrap();
    let code = tc.channel.last_code_for(EMAIL).unwrap().code;
    services::verify_reset_code(&tc.ctx, verify_request(EMAIL, &code)).await.unwrap();

    let err = services::reset_password(&tc.ctx, reset_request(EMAIL, PASSWORD)).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::PasswordUsedBefore);

    // A rejection doesn't burn the verification - a fresh password is accepted.
    services::reset_password(&tc.ctx, reset_request(EMAIL, "N3w!Secret")).await.unwrap();

    // And a retained historical password is rejected on the next cycle.
    services::forgot_password(&tc.ctx, forgot_request(EMAIL)).await.unwrap();
    let code = tc.channel.last_code_for(EMAIL).unwrap().code;
    services::verify_reset_code(&tc.ctx, verify_request(EMAIL, &code)).await.unwrap();

    let err = services::reset_password(&tc.ctx, reset_request(EMAIL, PASSWORD)).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::PasswordUsedBefore);
}


#[tokio::test]
async fn test_the_retained_history_is_bounded() {
    let tc = start_gatehouse();
    set_time("2021-08-23T09:30:00Z", &tc);
    register(EMAIL, PASSWORD, &tc).await;

    for round in 1..=6 {
        reset_flow(EMAIL, &format!("N3w!Secret{}", round), &tc).await;
    }

    let account = tc.store.snapshot(EMAIL).unwrap();
    assert_eq!(account.history.len(), 5);

    // The change timestamp moved with the final reset.
    set_time("2021-11-30T09:30:00Z", &tc);
    let err = services::login(&tc.ctx, LoginRequest { email: EMAIL.to_string(), password: "N3w!Secret6".to_string() }).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::PasswordExpired);
}


#[tokio::test]
async fn test_a_completed_reset_clears_a_lockout() {
    let tc = start_gatehouse();
    register(EMAIL, PASSWORD, &tc).await;

    // Lock the account out.
    for _ in 0..10 {
        let _ = services::login(&tc.ctx, LoginRequest { email: EMAIL.to_string(), password: "Wr0ng!Pass".to_string() }).await;
    }

    // Proving email possession through the reset flow lifts the lock immediately.
    reset_flow(EMAIL, "N3w!Secret", &tc).await;

    let account = tc.store.snapshot(EMAIL).unwrap();
    assert_eq!(account.failed_attempts, 0);
    assert_eq!(account.lock_until, None);

    login_for_code(EMAIL, "N3w!Secret", &tc).await;
}


#[tokio::test]
async fn test_a_weak_replacement_password_is_rejected() {
    let tc = start_gatehouse();
    register(EMAIL, PASSWORD, &tc).await;

    services::forgot_password(&tc.ctx, forgot_request(EMAIL)).await.unwrap();
    let code = tc.channel.last_code_for(EMAIL).unwrap().code;
    services::verify_reset_code(&tc.ctx, verify_request(EMAIL, &code)).await.unwrap();

    let err = services::reset_password(&tc.ctx, reset_request(EMAIL, "weak")).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::PasswordTooShort);
}
