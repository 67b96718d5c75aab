//! Creation outcome
//!
//! A patient is durable once the initial write succeeds. Later remote steps
//! can fail without undoing that write, so creation reports them as warnings
//! on an otherwise successful result.

use super::billing::BillingAccount;
use super::errors::{EmissionError, ProvisioningError};
use super::patient::{Patient, PatientResponse};
use std::fmt;

/// Post-persist step of the creation workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffectStep {
    Provisioning,
    Emission,
}

impl fmt::Display for SideEffectStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideEffectStep::Provisioning => f.write_str("billing provisioning"),
            SideEffectStep::Emission => f.write_str("event emission"),
        }
    }
}

/// Something that did not complete after the patient was persisted
#[derive(Debug, Clone)]
pub enum CreationWarning {
    /// Billing provisioning failed after all retries
    ProvisioningFailed(ProvisioningError),

    /// Event publish failed after all retries
    EmissionFailed(EmissionError),

    /// Emission was not attempted because provisioning failed
    EmissionDeferred,

    /// The step succeeded but its marker could not be written
    MarkerNotRecorded {
        step: SideEffectStep,
        message: String,
    },
}

impl CreationWarning {
    /// Step the relay will have to redo or finish
    pub fn step(&self) -> SideEffectStep {
        match self {
            CreationWarning::ProvisioningFailed(_) => SideEffectStep::Provisioning,
            CreationWarning::EmissionFailed(_) | CreationWarning::EmissionDeferred => {
                SideEffectStep::Emission
            }
            CreationWarning::MarkerNotRecorded { step, .. } => *step,
        }
    }
}

impl fmt::Display for CreationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationWarning::ProvisioningFailed(e) => write!(f, "billing provisioning failed: {e}"),
            CreationWarning::EmissionFailed(e) => write!(f, "event emission failed: {e}"),
            CreationWarning::EmissionDeferred => {
                f.write_str("event emission deferred until billing is provisioned")
            }
            CreationWarning::MarkerNotRecorded { step, message } => {
                write!(f, "{step} succeeded but was not recorded: {message}")
            }
        }
    }
}

/// Result of a successful `create_patient`
#[derive(Debug, Clone)]
pub struct CreatedPatient {
    /// The persisted record, including whatever markers were written
    pub patient: Patient,

    /// Account returned by the billing provisioner, if provisioning succeeded
    pub billing_account: Option<BillingAccount>,

    /// Whether the creation event was published
    pub event_published: bool,

    /// Steps that did not complete
    pub warnings: Vec<CreationWarning>,
}

impl CreatedPatient {
    /// True when every side effect completed and was recorded
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn response(&self) -> PatientResponse {
        self.patient.to_response()
    }
}
