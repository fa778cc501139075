use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::instrument;
use crate::db::normalise_email;
use crate::model::algorithm;
use crate::utils::{context::ServiceContext, errors::{ErrorCode, AuthError}};

#[derive(Clone, Debug, Deserialize)]
pub struct VerifyResetCodeRequest {
    pub email: String,
    pub code: String,
}

///
/// Reset flow step 2: prove possession of the emailed code.
///
/// A correct code is single-use - it is cleared and replaced by a short verification
/// window during which reset_password will accept a new password for the account.
///
#[instrument(skip(ctx, request))]
pub async fn verify_reset_code(ctx: &ServiceContext, request: VerifyResetCodeRequest) -> Result<(), AuthError> {

    let email = normalise_email(&request.email);
    let mut account = match ctx.store().find_by_email(&email).await? {
        Some(account) => account,
        None => return Err(invalid_code()),
    };

    let now = ctx.now();

    let code_hash = match &account.reset_code {
        Some(hash) => hash.clone(),
        None => return Err(invalid_code()),
    };

    let expires: DateTime<Utc> = match account.reset_code_expires {
        Some(expires) => expires.into(),
        None => return Err(invalid_code()),
    };

    if now > expires {
        return Err(ErrorCode::CodeExpired.with_msg("the code is invalid or has expired"))
    }

    let code = request.code.clone();
    let matched = tokio::task::spawn_blocking(move || algorithm::validate(&code, &code_hash))
        .await
        .map_err(AuthError::from)?
        ?;

    if !matched {
        account.reset_attempts += 1;

        if account.reset_attempts >= ctx.policy().max_code_attempts {
            account.reset_code = None;
            account.reset_code_expires = None;
            account.reset_attempts = 0;
            ctx.store().save(&account).await?;

            tracing::warn!("Account {} exceeded the reset code attempt cap", account.account_id);
            return Err(ErrorCode::CodeAttemptsExceeded
                .with_msg("too many incorrect codes, please start the reset again"))
        }

        ctx.store().save(&account).await?;
        return Err(invalid_code())
    }

    account.reset_code = None;
    account.reset_code_expires = None;
    account.reset_attempts = 0;
    account.reset_verified_until = Some(bson::DateTime::from_chrono(
        now + Duration::minutes(ctx.policy().reset_code_minutes as i64)));

    ctx.store().save(&account).await?;

    tracing::info!("Account {} verified a reset code", account.account_id);
    Ok(())
}

fn invalid_code() -> AuthError {
    ErrorCode::InvalidCode.with_msg("the code is invalid or has expired")
}
