//! In-process event channel
//!
//! Broadcasts events to local subscribers. Useful for single-process
//! deployments and for tests that need to observe emitted events.

use super::traits::EventEmitter;
use crate::domain::{EmissionError, PatientCreatedEvent};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Event emitter backed by a tokio broadcast channel
#[derive(Clone)]
pub struct ChannelEventEmitter {
    sender: broadcast::Sender<PatientCreatedEvent>,
}

impl ChannelEventEmitter {
    /// Create an emitter buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<PatientCreatedEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl EventEmitter for ChannelEventEmitter {
    fn target_name(&self) -> &'static str {
        "channel"
    }

    async fn publish(&self, event: &PatientCreatedEvent) -> Result<(), EmissionError> {
        match self.sender.send(event.clone()) {
            Ok(receivers) => {
                tracing::debug!(patient_id = %event.patient_id, receivers, "Patient event broadcast");
            }
            Err(_) => {
                // Nobody listening; the bus still accepted the event.
                tracing::debug!(patient_id = %event.patient_id, "Patient event broadcast with no subscribers");
            }
        }
        Ok(())
    }
}
