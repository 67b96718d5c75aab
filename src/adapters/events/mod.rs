//! Event bus emitters
//!
//! - [`kafka_rest`] - Kafka REST proxy over HTTP
//! - [`channel`] - In-process broadcast channel

pub mod channel;
pub mod kafka_rest;
pub mod traits;

pub use channel::ChannelEventEmitter;
pub use kafka_rest::KafkaRestEmitter;
pub use traits::EventEmitter;

use crate::config::{EventTarget, EventsConfig};
use crate::domain::EmissionError;
use std::sync::Arc;

/// Create the emitter selected by `events.target`
///
/// # Errors
///
/// Returns `EmissionError::Configuration` if the selected emitter is misconfigured.
pub fn create_event_emitter(
    config: &EventsConfig,
) -> Result<Arc<dyn EventEmitter + Send + Sync>, EmissionError> {
    match config.target {
        EventTarget::KafkaRest => {
            tracing::info!(topic = %config.topic, "Creating Kafka REST event emitter");
            Ok(Arc::new(KafkaRestEmitter::new(config)?))
        }
        EventTarget::Channel => {
            tracing::info!(capacity = config.channel_capacity, "Creating in-process event channel");
            Ok(Arc::new(ChannelEventEmitter::new(config.channel_capacity)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_target() {
        let config = EventsConfig {
            target: EventTarget::Channel,
            base_url: None,
            topic: "patient".to_string(),
            username: None,
            password: None,
            timeout_seconds: 5,
            channel_capacity: 4,
            retry: Default::default(),
        };
        assert_eq!(create_event_emitter(&config).unwrap().target_name(), "channel");

        let kafka = EventsConfig {
            target: EventTarget::KafkaRest,
            base_url: Some("http://localhost:8082".to_string()),
            ..config
        };
        assert_eq!(create_event_emitter(&kafka).unwrap().target_name(), "kafka_rest");
    }
}
