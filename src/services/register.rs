use serde::Deserialize;
use tracing::instrument;
use crate::db::normalise_email;
use crate::model::account::{Account, Identity};
use crate::utils::{self, context::ServiceContext, errors::{ErrorCode, AuthError}};

#[derive(Clone, Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

///
/// Create a new account with the default user role.
///
/// The password must satisfy the complexity rules and is only ever stored hashed. A
/// duplicate email is reported as a validation failure.
///
#[instrument(skip(ctx, request))]
pub async fn register(ctx: &ServiceContext, request: RegisterRequest) -> Result<Identity, AuthError> {

    if request.email.trim().is_empty() || request.display_name.trim().is_empty() || request.password.is_empty() {
        return Err(ErrorCode::FieldMandatory.with_msg("email, display name and password are all required"))
    }

    ctx.policy().validate_pattern(&request.password)?;

    // Hashing is a highly CPU-bound activity, perform it on the blocking worker
    // thread pool rather than the main event loop.
    let hasher = ctx.hasher().clone();
    let password = request.password.clone();
    let phc = tokio::task::spawn_blocking(move || hasher.hash_into_phc(&password))
        .await
        .map_err(AuthError::from)?
        ?;

    let account = Account::new(
        utils::generate_id(),
        normalise_email(&request.email),
        request.display_name.trim().to_string(),
        phc,
        bson::DateTime::from_chrono(ctx.now()));

    ctx.store().insert(&account).await?;

    tracing::info!("Registered account {}", account.account_id);
    Ok(Identity::from(&account))
}
