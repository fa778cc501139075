use chrono::Duration;
use serde::Deserialize;
use tracing::instrument;
use crate::db::normalise_email;
use crate::notify::CodePurpose;
use crate::utils::{self, context::ServiceContext, errors::AuthError};

#[derive(Clone, Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

///
/// Begin the password reset flow by issuing a time-boxed code.
///
/// The response is identical whether or not the email is registered, so the operation
/// cannot be used to probe which addresses hold an account.
///
#[instrument(skip(ctx, request))]
pub async fn forgot_password(ctx: &ServiceContext, request: ForgotPasswordRequest) -> Result<(), AuthError> {

    let email = normalise_email(&request.email);
    let mut account = match ctx.store().find_by_email(&email).await? {
        Some(account) => account,
        None => {
            tracing::debug!("Reset requested for unregistered email");
            return Ok(())
        },
    };

    let now = ctx.now();

    // A new code supersedes any outstanding one and voids any earlier verification.
    let code = utils::generate_one_time_code();
    let hasher = ctx.hasher().clone();
    let code_to_hash = code.clone();
    let code_hash = tokio::task::spawn_blocking(move || hasher.hash_into_phc(&code_to_hash))
        .await
        .map_err(AuthError::from)?
        ?;

    let expires_at = now + Duration::minutes(ctx.policy().reset_code_minutes as i64);
    account.reset_code = Some(code_hash);
    account.reset_code_expires = Some(bson::DateTime::from_chrono(expires_at));
    account.reset_attempts = 0;
    account.reset_verified_until = None;

    ctx.store().save(&account).await?;
    ctx.send_code(&account.email, &code, CodePurpose::Reset, expires_at).await;

    Ok(())
}
