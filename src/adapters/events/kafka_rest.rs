//! Kafka REST proxy emitter
//!
//! Posts each event as a single JSON record to `{base_url}/topics/{topic}`,
//! keyed by patient id so consumers can deduplicate.

use super::traits::EventEmitter;
use crate::config::EventsConfig;
use crate::domain::{EmissionError, PatientCreatedEvent};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::time::Duration;

/// Content type for JSON records in the Kafka REST v2 API
pub const KAFKA_JSON_CONTENT_TYPE: &str = "application/vnd.kafka.json.v2+json";

#[derive(Serialize)]
struct ProduceRequest<'a> {
    records: [ProduceRecord<'a>; 1],
}

#[derive(Serialize)]
struct ProduceRecord<'a> {
    key: String,
    value: &'a PatientCreatedEvent,
}

/// Event emitter backed by a Kafka REST proxy
pub struct KafkaRestEmitter {
    client: Client,
    topic_url: String,
    auth_header: Option<String>,
}

impl KafkaRestEmitter {
    /// Create a new emitter
    ///
    /// # Errors
    ///
    /// Returns `EmissionError::Configuration` if `events.base_url` is missing
    /// or the HTTP client cannot be built.
    pub fn new(config: &EventsConfig) -> Result<Self, EmissionError> {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            EmissionError::Configuration("events.base_url is not set".to_string())
        })?;

        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
            .build()
            .map_err(|e| EmissionError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let auth_header = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                let credentials = format!("{username}:{}", password.expose_secret().as_str());
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Some(format!("Basic {encoded}"))
            }
            _ => None,
        };

        let topic_url = format!("{}/topics/{}", base_url.trim_end_matches('/'), config.topic);
        tracing::info!(topic_url = %topic_url, "Kafka REST emitter configured");

        Ok(Self {
            client,
            topic_url,
            auth_header,
        })
    }

    pub fn topic_url(&self) -> &str {
        &self.topic_url
    }
}

#[async_trait]
impl EventEmitter for KafkaRestEmitter {
    fn target_name(&self) -> &'static str {
        "kafka_rest"
    }

    async fn publish(&self, event: &PatientCreatedEvent) -> Result<(), EmissionError> {
        let body = serde_json::to_vec(&ProduceRequest {
            records: [ProduceRecord {
                key: event.key(),
                value: event,
            }],
        })
        .map_err(|e| EmissionError::Encoding(e.to_string()))?;

        let mut request = self
            .client
            .post(&self.topic_url)
            .header(reqwest::header::CONTENT_TYPE, KAFKA_JSON_CONTENT_TYPE)
            .body(body);

        if let Some(ref auth) = self.auth_header {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmissionError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(patient_id = %event.patient_id, "Patient event published");
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(if status.is_server_error() {
            EmissionError::ServerError {
                status: status.as_u16(),
                message,
            }
        } else if status.is_client_error() {
            EmissionError::ClientError {
                status: status.as_u16(),
                message,
            }
        } else {
            EmissionError::Unavailable(format!("Unexpected status {status}"))
        })
    }
}
