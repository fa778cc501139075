use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use crate::db::normalise_email;
use crate::model::algorithm;
use crate::notify::CodePurpose;
use crate::utils::{self, context::ServiceContext, errors::{ErrorCode, AuthError}};

#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginResponse {
    /// Always true on success - step 1 never grants a session.
    pub mfa_required: bool,
}

///
/// Login step 1: the password check.
///
/// On success a one-time code is issued and dispatched out-of-band; the caller must
/// complete verify_mfa to obtain a session. Unknown email and wrong password share one
/// generic failure so account existence is not leaked.
///
#[instrument(skip(ctx, request))]
pub async fn login(ctx: &ServiceContext, request: LoginRequest) -> Result<LoginResponse, AuthError> {

    let email = normalise_email(&request.email);
    let mut account = match ctx.store().find_by_email(&email).await? {
        Some(account) => account,
        None => return Err(invalid_credentials()),
    };

    let now = ctx.now();

    // lock_until in the future refuses login regardless of password correctness.
    if let Some(lock_until) = account.lock_until {
        let lock_until: DateTime<Utc> = lock_until.into();
        if lock_until > now {
            return Err(ErrorCode::AccountLocked
                .with_msg(&format!("account locked, try again in {} minute(s)", remaining_minutes(lock_until, now))))
        }
    }

    // Password verification is CPU-bound, run it on the blocking worker thread pool.
    let phc = account.phc.clone();
    let password = request.password.clone();
    let valid = tokio::task::spawn_blocking(move || algorithm::validate(&password, &phc))
        .await
        .map_err(AuthError::from)?
        ?;

    if !valid {
        account.failed_attempts += 1;

        if account.failed_attempts >= ctx.policy().max_failed_logins {
            account.lock_until = Some(bson::DateTime::from_chrono(
                now + Duration::minutes(ctx.policy().lockout_minutes as i64)));
            ctx.store().save(&account).await?;

            tracing::warn!("Account {} locked after {} failed logins", account.account_id, account.failed_attempts);
            return Err(ErrorCode::AccountLocked
                .with_msg(&format!("too many failed attempts, account locked for {} minutes", ctx.policy().lockout_minutes)))
        }

        ctx.store().save(&account).await?;
        return Err(invalid_credentials())
    }

    // Correct password but expired: no counter reset and no code - the reset flow is
    // the only way forward.
    if ctx.policy().expired(account.changed_on.into(), now) {
        return Err(ErrorCode::PasswordExpired
            .with_msg("the password has expired and must be reset before logging in"))
    }

    account.failed_attempts = 0;
    account.lock_until = None;

    // Issue the one-time code - a new code supersedes any outstanding one.
    let code = utils::generate_one_time_code();
    let hasher = ctx.hasher().clone();
    let code_to_hash = code.clone();
    let code_hash = tokio::task::spawn_blocking(move || hasher.hash_into_phc(&code_to_hash))
        .await
        .map_err(AuthError::from)?
        ?;

    let expires_at = now + Duration::minutes(ctx.policy().mfa_code_minutes as i64);
    account.mfa_code = Some(code_hash);
    account.mfa_code_expires = Some(bson::DateTime::from_chrono(expires_at));
    account.mfa_attempts = 0;

    // The code hash must be persisted before the dispatch is attempted.
    ctx.store().save(&account).await?;
    ctx.send_code(&account.email, &code, CodePurpose::Mfa, expires_at).await;

    Ok(LoginResponse { mfa_required: true })
}

fn invalid_credentials() -> AuthError {
    ErrorCode::InvalidCredentials.with_msg("invalid credentials")
}

fn remaining_minutes(until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ((until - now).num_seconds() + 59) / 60
}
