use chrono::DateTime;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use crate::db::normalise_email;
use crate::model::{account::Identity, algorithm};
use crate::token::TokenPair;
use crate::utils::{context::ServiceContext, errors::{ErrorCode, AuthError}};

/// How many refresh tokens an account may hold - the oldest is evicted beyond this.
const MAX_ACTIVE_SESSIONS: usize = 10;

#[derive(Clone, Debug, Deserialize)]
pub struct VerifyMfaRequest {
    pub email: String,
    pub code: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct VerifyMfaResponse {
    pub identity: Identity,
    pub tokens: TokenPair,
}

///
/// Login step 2: verify the emailed code and grant a session.
///
/// A wrong code leaves the stored code in place so it can be retried until it expires
/// or the attempt cap is reached. A correct code is single-use - it is cleared in the
/// same save that records the new refresh token.
///
#[instrument(skip(ctx, request))]
pub async fn verify_mfa(ctx: &ServiceContext, request: VerifyMfaRequest) -> Result<VerifyMfaResponse, AuthError> {

    let email = normalise_email(&request.email);
    let mut account = match ctx.store().find_by_email(&email).await? {
        Some(account) => account,
        None => return Err(invalid_code()),
    };

    let now = ctx.now();

    let code_hash = match &account.mfa_code {
        Some(hash) => hash.clone(),
        None => return Err(invalid_code()),
    };

    let expires: DateTime<Utc> = match account.mfa_code_expires {
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
        account.mfa_attempts += 1;

        if account.mfa_attempts >= ctx.policy().max_code_attempts {
            account.mfa_code = None;
            account.mfa_code_expires = None;
            account.mfa_attempts = 0;
            ctx.store().save(&account).await?;

            tracing::warn!("Account {} exceeded the code attempt cap", account.account_id);
            return Err(ErrorCode::CodeAttemptsExceeded
                .with_msg("too many incorrect codes, please log in again"))
        }

        ctx.store().save(&account).await?;
        return Err(invalid_code())
    }

    account.mfa_code = None;
    account.mfa_code_expires = None;
    account.mfa_attempts = 0;

    let tokens = ctx.tokens().issue_pair(&account, now)?;

    account.refresh_tokens.push(tokens.refresh_jti.clone());
    if account.refresh_tokens.len() > MAX_ACTIVE_SESSIONS {
        let excess = account.refresh_tokens.len() - MAX_ACTIVE_SESSIONS;
        account.refresh_tokens.drain(0..excess);
    }

    ctx.store().save(&account).await?;

    tracing::info!("Account {} authenticated", account.account_id);
    Ok(VerifyMfaResponse { identity: Identity::from(&account), tokens })
}

fn invalid_code() -> AuthError {
    ErrorCode::InvalidCode.with_msg("the code is invalid or has expired")
}
