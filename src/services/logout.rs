use serde::Deserialize;
use tracing::instrument;
use crate::token::TokenType;
use crate::utils::{context::ServiceContext, errors::AuthError};

#[derive(Clone, Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

///
/// Revoke the session behind a refresh token.
///
/// Idempotent: an expired, malformed or already-revoked token still results in a
/// logged-out client, so those are all treated as success.
///
#[instrument(skip(ctx, request))]
pub async fn logout(ctx: &ServiceContext, request: LogoutRequest) -> Result<(), AuthError> {

    let claims = match ctx.tokens().verify(&request.refresh_token, TokenType::Refresh, ctx.now()) {
        Ok(claims) => claims,
        Err(_) => return Ok(()),
    };

    let mut account = match ctx.store().find_by_id(&claims.sub).await? {
        Some(account) => account,
        None => return Ok(()),
    };

    let before = account.refresh_tokens.len();
    account.refresh_tokens.retain(|jti| jti != &claims.jti);

    if account.refresh_tokens.len() != before {
        ctx.store().save(&account).await?;
        tracing::info!("Account {} logged out", account.account_id);
    }

    Ok(())
}
