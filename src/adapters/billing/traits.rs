//! Billing provisioner abstraction

use crate::domain::{BillingAccount, PatientId, ProvisioningError};
use async_trait::async_trait;

/// Creates billing accounts in the external billing system
///
/// Implementations should treat `patient_id` as an idempotency key: the
/// relay may call again for a patient whose earlier attempt succeeded remotely
/// but was never recorded.
#[async_trait]
pub trait BillingProvisioner: Send + Sync {
    /// Create a billing account for a persisted patient
    async fn create_billing_account(
        &self,
        patient_id: &PatientId,
        name: &str,
        email: &str,
    ) -> Result<BillingAccount, ProvisioningError>;
}
