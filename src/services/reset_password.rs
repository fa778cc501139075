use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;
use crate::db::normalise_email;
use crate::utils::{context::ServiceContext, errors::{ErrorCode, AuthError}};

#[derive(Clone, Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub password: String,
}

///
/// Reset flow step 3: replace the password inside the verification window.
///
/// The new password must satisfy the complexity rules and must not match the current
/// password or any retained previous one. Completing the reset also clears any lockout,
/// so a locked-out user who proves email possession regains access immediately.
///
#[instrument(skip(ctx, request))]
pub async fn reset_password(ctx: &ServiceContext, request: ResetPasswordRequest) -> Result<(), AuthError> {

    let email = normalise_email(&request.email);
    let mut account = match ctx.store().find_by_email(&email).await? {
        Some(account) => account,
        None => return Err(not_verified()),
    };

    let now = ctx.now();

    let verified_until: DateTime<Utc> = match account.reset_verified_until {
        Some(until) => until.into(),
        None => return Err(not_verified()),
    };

    if now > verified_until {
        return Err(ErrorCode::ResetWindowExpired
            .with_msg("the period to reset the password has expired, you must initiate the process again"))
    }

    ctx.policy().validate_pattern(&request.password)?;

    // History comparison and hashing both grind through the hash function, keep them
    // off the main event loop together.
    let policy = ctx.policy().clone();
    let hasher = ctx.hasher().clone();
    let password = request.password.clone();
    let history_check = account.clone();
    let phc = tokio::task::spawn_blocking(move || {
            policy.validate_history(&password, &history_check)?;
            hasher.hash_into_phc(&password)
        })
        .await
        .map_err(AuthError::from)?
        ?;

    let previous = std::mem::replace(&mut account.phc, phc);
    account.history.push(previous);
    while account.history.len() > ctx.policy().history_depth {
        account.history.remove(0);
    }

    account.changed_on = bson::DateTime::from_chrono(now);
    account.reset_verified_until = None;

    // Possession of the email has been proven, so any lockout is lifted.
    account.failed_attempts = 0;
    account.lock_until = None;

    ctx.store().save(&account).await?;

    tracing::info!("Account {} reset their password", account.account_id);
    Ok(())
}

fn not_verified() -> AuthError {
    ErrorCode::ResetNotVerified.with_msg("the reset code must be verified before the password can be changed")
}
