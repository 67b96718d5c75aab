//! Post-persist side effects
//!
//! Drives billing provisioning and then event emission for a patient that is
//! already durable, recording a marker on the patient after each step. Steps
//! whose marker is already set are skipped, so the same driver serves both the
//! creation path and the relay.

use crate::adapters::billing::{BillingProvisioner, GrpcBillingClient};
use crate::adapters::events::{create_event_emitter, EventEmitter};
use crate::adapters::store::PatientStore;
use crate::config::PatientServiceConfig;
use crate::core::retry::RetryPolicy;
use crate::domain::{
    CreationWarning, Patient, PatientCreatedEvent, Result, SideEffectStep,
};
use crate::log_side_effect_failure;
use std::sync::Arc;

/// Patient after a side-effect pass, plus whatever did not complete
#[derive(Debug, Clone)]
pub struct SideEffectOutcome {
    pub patient: Patient,
    pub warnings: Vec<CreationWarning>,

    /// The patient was deleted while the pass was running; nothing more was attempted
    pub removed: bool,
}

impl SideEffectOutcome {
    fn new(patient: Patient, warnings: Vec<CreationWarning>) -> Self {
        Self {
            patient,
            warnings,
            removed: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Sequences provision → emit for persisted patients
pub struct SideEffectDriver {
    store: Arc<dyn PatientStore + Send + Sync>,
    billing: Arc<dyn BillingProvisioner + Send + Sync>,
    events: Arc<dyn EventEmitter + Send + Sync>,
    billing_policy: RetryPolicy,
    events_policy: RetryPolicy,
}

impl SideEffectDriver {
    pub fn new(
        store: Arc<dyn PatientStore + Send + Sync>,
        billing: Arc<dyn BillingProvisioner + Send + Sync>,
        events: Arc<dyn EventEmitter + Send + Sync>,
        billing_policy: RetryPolicy,
        events_policy: RetryPolicy,
    ) -> Self {
        Self {
            store,
            billing,
            events,
            billing_policy,
            events_policy,
        }
    }

    /// Build the driver with the billing client and emitter named in the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the billing endpoint or the event target is misconfigured.
    pub fn from_config(
        store: Arc<dyn PatientStore + Send + Sync>,
        config: &PatientServiceConfig,
    ) -> Result<Self> {
        let billing = Arc::new(GrpcBillingClient::new(&config.billing)?);
        let events = create_event_emitter(&config.events)?;

        Ok(Self::new(
            store,
            billing,
            events,
            RetryPolicy::from_config(&config.billing.retry, config.billing.timeout()),
            RetryPolicy::from_config(&config.events.retry, config.events.timeout()),
        ))
    }

    /// Run every outstanding step for `patient`
    ///
    /// Never fails: each incomplete step is reported as a warning and left for
    /// the relay. Emission is not attempted while billing is unprovisioned.
    pub async fn complete(&self, mut patient: Patient) -> SideEffectOutcome {
        let mut warnings = Vec::new();

        if patient.billing_account.is_none() {
            let id = patient.id;
            let name = patient.name.clone();
            let email = patient.email.clone();

            let provisioned = self
                .billing_policy
                .execute("billing.create_account", || {
                    self.billing.create_billing_account(&id, &name, &email)
                })
                .await;

            match provisioned {
                Ok(account) => {
                    tracing::info!(
                        patient_id = %id,
                        account_id = %account.account_id,
                        "Billing account provisioned"
                    );
                    match self.store.mark_provisioned(&id, &account).await {
                        Ok(true) => {}
                        Ok(false) => {
                            tracing::info!(
                                patient_id = %id,
                                "Patient deleted during provisioning, skipping event"
                            );
                            patient.billing_account = Some(account);
                            return SideEffectOutcome {
                                patient,
                                warnings,
                                removed: true,
                            };
                        }
                        Err(e) => {
                            log_side_effect_failure!(id, SideEffectStep::Provisioning, e);
                            warnings.push(CreationWarning::MarkerNotRecorded {
                                step: SideEffectStep::Provisioning,
                                message: e.to_string(),
                            });
                        }
                    }
                    patient.billing_account = Some(account);
                }
                Err(e) => {
                    log_side_effect_failure!(id, SideEffectStep::Provisioning, e);
                    warnings.push(CreationWarning::ProvisioningFailed(e));
                    if !patient.event_published {
                        warnings.push(CreationWarning::EmissionDeferred);
                    }
                    return SideEffectOutcome::new(patient, warnings);
                }
            }
        }

        if !patient.event_published {
            let event = PatientCreatedEvent::for_patient(&patient);

            let published = self
                .events_policy
                .execute("events.publish", || self.events.publish(&event))
                .await;

            match published {
                Ok(()) => {
                    tracing::info!(
                        patient_id = %patient.id,
                        event_id = %event.event_id,
                        target = self.events.target_name(),
                        "Patient created event published"
                    );
                    if let Err(e) = self.store.mark_event_published(&patient.id).await {
                        log_side_effect_failure!(patient.id, SideEffectStep::Emission, e);
                        warnings.push(CreationWarning::MarkerNotRecorded {
                            step: SideEffectStep::Emission,
                            message: e.to_string(),
                        });
                    }
                    patient.event_published = true;
                }
                Err(e) => {
                    log_side_effect_failure!(patient.id, SideEffectStep::Emission, e);
                    warnings.push(CreationWarning::EmissionFailed(e));
                }
            }
        }

        SideEffectOutcome::new(patient, warnings)
    }
}
