//! Event emitter abstraction

use crate::domain::{EmissionError, PatientCreatedEvent};
use async_trait::async_trait;

/// Publish-only channel to the event bus
///
/// Success means the bus accepted the event; no consumer acknowledgment is implied.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    /// Short target name for logs and status output
    fn target_name(&self) -> &'static str;

    /// Publish a patient created event
    async fn publish(&self, event: &PatientCreatedEvent) -> Result<(), EmissionError>;
}
