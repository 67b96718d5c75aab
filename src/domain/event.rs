//! Patient created event
//!
//! Immutable fact published once a patient has been persisted. Consumers
//! should deduplicate on `patient_id` since delivery is at-least-once.

use super::ids::PatientId;
use super::patient::Patient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type tag carried in every creation event
pub const PATIENT_CREATED: &str = "PATIENT_CREATED";

/// Domain event announcing a new patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientCreatedEvent {
    /// Unique id of this event instance
    pub event_id: Uuid,

    /// Always [`PATIENT_CREATED`]
    pub event_type: String,

    pub patient_id: PatientId,
    pub name: String,
    pub email: String,

    /// Creation time of the patient, unchanged when the relay redelivers
    pub occurred_at: DateTime<Utc>,
}

impl PatientCreatedEvent {
    /// Builds the event for a persisted patient
    pub fn for_patient(patient: &Patient) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: PATIENT_CREATED.to_string(),
            patient_id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            occurred_at: patient.created_at,
        }
    }

    /// Partition key for the event bus
    pub fn key(&self) -> String {
        self.patient_id.to_string()
    }
}
