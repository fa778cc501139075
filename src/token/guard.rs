use super::TokenType;
use crate::model::account::Identity;
use crate::utils::context::ServiceContext;
use crate::utils::errors::{ErrorCode, AuthError};

///
/// The session guard - resolve a presented token to a live identity or reject.
///
/// The transport layer extracts the raw token (cookie preferred, bearer header as the
/// fallback) and calls this for every protected request. Missing token, expired token,
/// bad signature and a vanished account are distinct error codes for the server-side
/// logs, but they all map to the Authentication kind so the response leaks nothing.
///
pub async fn resolve_identity(ctx: &ServiceContext, token: Option<&str>) -> Result<Identity, AuthError> {

    let token = match token {
        Some(token) => token,
        None => return Err(ErrorCode::TokenMissing.with_msg("no session token was provided")),
    };

    let claims = ctx.tokens().verify(token, TokenType::Access, ctx.now())?;

    // The token is only half the story - the account must still exist.
    match ctx.store().find_by_id(&claims.sub).await? {
        Some(account) => Ok(Identity::from(&account)),
        None => Err(ErrorCode::AccountGone.with_msg("the session is no longer valid")),
    }
}
