pub mod db;
pub mod model;
pub mod notify;
pub mod services;
pub mod token;
pub mod utils;

use std::sync::Arc;
use dotenv::dotenv;
use db::mongo::{self, MongoCredentialStore};
use notify::NotificationChannel;
use utils::config::{self, Configuration};
use utils::context::ServiceContext;
use utils::errors::AuthError;

pub const APP_NAME: &str = "Gatehouse";

///
/// Build a ready-to-use service context from the environment: configuration, MongoDB
/// connection, schema sync and the notification channel.
///
/// The embedding service (the chat backend's route layer) calls this once at start-up
/// and hands the returned context to the operations in the services module.
///
pub async fn bootstrap() -> Result<Arc<ServiceContext>, AuthError> {

    // Load any local dev settings as environment variables from a .env file.
    dotenv().ok();

    // Default log level to INFO if it's not specified.
    config::default_env("RUST_LOG", "INFO");

    // Load the service configuration into struct.
    let config = Configuration::from_env()?;

    // Create a MongoDB client and connect to it before proceeding.
    let db = mongo::get_mongo_db(APP_NAME, &config).await?;

    // Ensure the schema is in sync with the code.
    mongo::update_mongo(&db).await?;

    let store = Arc::new(MongoCredentialStore::new(db));
    let notifier = notification_channel(&config);

    Ok(Arc::new(ServiceContext::new(config, store, notifier)?))
}

#[cfg(feature = "kafka")]
fn notification_channel(config: &Configuration) -> Arc<dyn NotificationChannel> {
    Arc::new(notify::kafka::KafkaChannel::new(config))
}

#[cfg(not(feature = "kafka"))]
fn notification_channel(_config: &Configuration) -> Arc<dyn NotificationChannel> {
    tracing::info!("No notification channel configured - one-time codes will be discarded");
    Arc::new(notify::DiscardChannel)
}
