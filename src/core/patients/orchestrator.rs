//! Patient orchestrator
//!
//! Owns the mutation workflows. Creation sequences persist → provision → emit;
//! update and delete touch only the record store. Every successful mutation
//! drops cached browse pages when invalidation is enabled.

use super::side_effects::SideEffectDriver;
use crate::adapters::cache::{create_result_cache, ResultCache};
use crate::adapters::store::{create_patient_store, PatientStore};
use crate::config::PatientServiceConfig;
use crate::domain::{
    CreatedPatient, Patient, PatientError, PatientId, PatientRequest, PatientResponse, Result,
};
use std::sync::Arc;

/// Tunables for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Largest page size accepted by `list_patients`
    pub max_page_size: u32,

    /// Invalidate the result cache after every successful mutation
    pub invalidate_on_mutation: bool,
}

impl OrchestratorSettings {
    pub fn from_config(config: &PatientServiceConfig) -> Self {
        Self {
            max_page_size: config.query.max_page_size,
            invalidate_on_mutation: config.cache.invalidate_on_mutation,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            invalidate_on_mutation: true,
        }
    }
}

/// Coordinates the record store, billing, events and result cache
pub struct PatientOrchestrator {
    pub(super) store: Arc<dyn PatientStore + Send + Sync>,
    pub(super) cache: Option<Arc<dyn ResultCache + Send + Sync>>,
    pub(super) settings: OrchestratorSettings,
    side_effects: SideEffectDriver,
}

impl PatientOrchestrator {
    pub fn new(
        store: Arc<dyn PatientStore + Send + Sync>,
        side_effects: SideEffectDriver,
        cache: Option<Arc<dyn ResultCache + Send + Sync>>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            store,
            cache,
            settings,
            side_effects,
        }
    }

    /// Create an orchestrator wired to the adapters named in the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any adapter cannot be created.
    pub async fn from_config(config: &PatientServiceConfig) -> Result<Self> {
        let store = create_patient_store(config).await?;
        let side_effects = SideEffectDriver::from_config(store.clone(), config)?;
        let cache = create_result_cache(&config.cache);

        Ok(Self::new(
            store,
            side_effects,
            cache,
            OrchestratorSettings::from_config(config),
        ))
    }

    pub fn store(&self) -> &Arc<dyn PatientStore + Send + Sync> {
        &self.store
    }

    /// Create a patient and run its side effects
    ///
    /// Fails only before or during the initial write. Billing and event
    /// failures after the write are returned as warnings on the result.
    ///
    /// # Errors
    ///
    /// - `PatientError::DuplicateEmail` if the email is already registered
    /// - `PatientError::Storage` if the initial write fails
    pub async fn create_patient(&self, request: PatientRequest) -> Result<CreatedPatient> {
        if self.store.exists_by_email(&request.email).await? {
            tracing::debug!(email = %request.email, "Rejecting create, email already registered");
            return Err(PatientError::DuplicateEmail(request.email));
        }

        let patient = self.store.save(&Patient::create(request)).await?;
        tracing::info!(patient_id = %patient.id, "Patient persisted");
        self.invalidate_cache("create").await;

        let outcome = self.side_effects.complete(patient).await;
        if outcome.removed {
            tracing::info!(patient_id = %outcome.patient.id, "Patient deleted before creation finished");
        } else if !outcome.is_complete() {
            tracing::warn!(
                patient_id = %outcome.patient.id,
                warnings = outcome.warnings.len(),
                "Patient created with incomplete side effects"
            );
        }

        Ok(CreatedPatient {
            billing_account: outcome.patient.billing_account.clone(),
            event_published: outcome.patient.event_published,
            patient: outcome.patient,
            warnings: outcome.warnings,
        })
    }

    /// Overwrite a patient's name, email, address and date of birth
    ///
    /// # Errors
    ///
    /// - `PatientError::NotFound` if no patient has this id
    /// - `PatientError::DuplicateEmail` if another patient holds the new email
    pub async fn update_patient(
        &self,
        id: &PatientId,
        request: PatientRequest,
    ) -> Result<PatientResponse> {
        let mut patient = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(PatientError::NotFound(*id))?;

        if self
            .store
            .exists_by_email_and_id_not(&request.email, id)
            .await?
        {
            return Err(PatientError::DuplicateEmail(request.email));
        }

        patient.apply(request);
        let saved = self.store.save(&patient).await?;
        tracing::info!(patient_id = %id, "Patient updated");
        self.invalidate_cache("update").await;

        Ok(saved.to_response())
    }

    /// Delete a patient; unknown ids succeed without effect
    ///
    /// Billing state is left in place.
    pub async fn delete_patient(&self, id: &PatientId) -> Result<()> {
        self.store.delete_by_id(id).await?;
        tracing::info!(patient_id = %id, "Patient deleted");
        self.invalidate_cache("delete").await;
        Ok(())
    }

    async fn invalidate_cache(&self, mutation: &str) {
        if !self.settings.invalidate_on_mutation {
            return;
        }
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate_all().await {
                tracing::warn!(mutation, error = %e, "Failed to invalidate result cache");
            }
        }
    }
}
