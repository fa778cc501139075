use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rdkafka::{ClientConfig, message::OwnedHeaders, producer::{FutureProducer, FutureRecord}};
use super::{CodePurpose, NotificationChannel};
use crate::APP_NAME;
use crate::model::events::CodeIssued;
use crate::utils::config::Configuration;
use crate::utils::errors::AuthError;

pub const TOPIC_CODE_ISSUED: &str = "auth.code.issued";

///
/// Publishes code-issued events for the mailer service to deliver.
///
pub struct KafkaChannel {
    producer: FutureProducer,
    config: Configuration,
}

impl KafkaChannel {
    pub fn new(config: &Configuration) -> Self {
        KafkaChannel {
            producer: producer(config),
            config: config.clone(),
        }
    }
}

pub fn producer(config: &Configuration) -> FutureProducer {
    ClientConfig::new()
        .set("bootstrap.servers", config.clone().kafka_servers)
        .set("message.timeout.ms", format!("{}", config.kafka_timeout))
        .create()
        .expect("Producer creation error")
}

#[async_trait]
impl NotificationChannel for KafkaChannel {
    async fn send_code(&self, destination: &str, code: &str, purpose: CodePurpose, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        let payload = serde_json::to_string(&CodeIssued {
            destination: destination.to_string(),
            code: code.to_string(),
            purpose,
            expires_at,
        })?;

        self.producer
            .send(
                FutureRecord::to(TOPIC_CODE_ISSUED)
                    .payload(&payload)
                    .key(destination) // Partition key - sequences per destination.
                    .headers(OwnedHeaders::new()
                        .add("version", "1")
                        .add("sender", APP_NAME)),
                Duration::from_millis(self.config.kafka_timeout as u64),
            )
            .await?;

        Ok(())
    }
}
