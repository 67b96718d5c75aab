//! Record store abstraction
//!
//! This module defines the trait that patient store adapters must implement.

use crate::domain::{BillingAccount, Page, PageRequest, Patient, PatientId, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable keyed storage of patient records
///
/// Implementations must be safe under concurrent access. Email uniqueness is
/// enforced by the orchestrator's pre-checks and, where the backend supports it,
/// by a unique constraint reported as `PatientError::DuplicateEmail`.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Short backend name for logs and status output
    fn backend_name(&self) -> &'static str;

    /// Test that the store is reachable
    async fn test_connection(&self) -> Result<()>;

    /// Returns true if any patient holds this email
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Returns true if a patient other than `id` holds this email
    async fn exists_by_email_and_id_not(&self, email: &str, id: &PatientId) -> Result<bool>;

    /// Loads a patient by id
    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>>;

    /// Inserts a new patient or overwrites the profile fields of an existing one
    ///
    /// Side-effect markers of an existing row are left as stored; use
    /// [`mark_provisioned`](Self::mark_provisioned) and
    /// [`mark_event_published`](Self::mark_event_published) to change them.
    async fn save(&self, patient: &Patient) -> Result<Patient>;

    /// Deletes a patient; deleting an unknown id succeeds
    async fn delete_by_id(&self, id: &PatientId) -> Result<()>;

    /// Unfiltered page, sorted per the request with id as tie-breaker
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Patient>>;

    /// Page of patients whose name contains `term`, case-insensitively
    async fn find_page_by_name_containing(
        &self,
        term: &str,
        request: &PageRequest,
    ) -> Result<Page<Patient>>;

    /// Patients created before `created_before` with outstanding side effects,
    /// oldest first
    async fn find_pending_side_effects(
        &self,
        created_before: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Patient>>;

    /// Records the billing account for a patient
    ///
    /// Returns false if the patient no longer exists.
    async fn mark_provisioned(&self, id: &PatientId, account: &BillingAccount) -> Result<bool>;

    /// Records that the creation event was published
    ///
    /// Returns false if the patient no longer exists.
    async fn mark_event_published(&self, id: &PatientId) -> Result<bool>;
}
