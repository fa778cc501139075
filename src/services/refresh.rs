use serde::{Deserialize, Serialize};
use tracing::instrument;
use crate::token::TokenType;
use crate::utils::{context::ServiceContext, errors::{ErrorCode, AuthError}};

#[derive(Clone, Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub access_expires: i64,
}

///
/// Mint a new access token from a live refresh token.
///
/// The refresh token itself is not rotated - it stays valid until it expires, is
/// revoked by logout, or is evicted when the account accumulates too many sessions.
///
#[instrument(skip(ctx, request))]
pub async fn refresh(ctx: &ServiceContext, request: RefreshRequest) -> Result<RefreshResponse, AuthError> {

    let now = ctx.now();
    let claims = ctx.tokens().verify(&request.refresh_token, TokenType::Refresh, now)?;

    let account = match ctx.store().find_by_id(&claims.sub).await? {
        Some(account) => account,
        None => return Err(ErrorCode::AccountGone.with_msg("the session is no longer valid")),
    };

    // Membership of the account's jti set is the revocation check.
    if !account.refresh_tokens.iter().any(|jti| jti == &claims.jti) {
        return Err(ErrorCode::TokenRevoked.with_msg("the refresh token has been revoked"))
    }

    let (access_token, access_expires) = ctx.tokens().issue_access(&account, now)?;
    Ok(RefreshResponse { access_token, access_expires })
}
