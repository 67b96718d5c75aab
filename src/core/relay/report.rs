//! Relay pass reporting

use crate::domain::{CreationWarning, PatientId, SideEffectStep};
use std::time::Duration;

/// A step the relay could not complete for one patient
#[derive(Debug, Clone)]
pub struct RelayFailure {
    pub patient_id: PatientId,
    pub step: SideEffectStep,
    pub message: String,
}

impl RelayFailure {
    pub fn from_warning(patient_id: PatientId, warning: &CreationWarning) -> Self {
        Self {
            patient_id,
            step: warning.step(),
            message: warning.to_string(),
        }
    }
}

/// Summary of one relay pass
#[derive(Debug, Clone, Default)]
pub struct RelayReport {
    /// Pending patients loaded from the store
    pub examined: usize,

    /// Patients whose side effects are now all done
    pub completed: usize,

    /// Patients still pending after this pass
    pub still_pending: usize,

    /// Patients deleted before their pass finished
    pub removed: usize,

    pub failures: Vec<RelayFailure>,

    pub duration: Duration,
}

impl RelayReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
