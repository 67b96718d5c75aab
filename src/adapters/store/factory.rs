//! Patient store factory
//!
//! Creates the store selected by `store.target`.

use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLPatientStore};
use crate::adapters::store::{InMemoryPatientStore, PatientStore};
use crate::config::schema::{PatientServiceConfig, StoreTarget};
use crate::domain::{PatientError, Result};
use std::sync::Arc;

/// Create a patient store based on the configuration
///
/// For PostgreSQL the schema is created if missing.
///
/// # Errors
///
/// Returns an error if the store cannot be created or the schema cannot be applied.
pub async fn create_patient_store(
    config: &PatientServiceConfig,
) -> Result<Arc<dyn PatientStore + Send + Sync>> {
    match config.store.target {
        StoreTarget::Memory => {
            tracing::info!("Creating in-memory patient store");
            Ok(Arc::new(InMemoryPatientStore::new()) as Arc<dyn PatientStore + Send + Sync>)
        }
        StoreTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                PatientError::Configuration(
                    "postgresql configuration is required when store.target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL patient store");
            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            client.ensure_schema().await?;

            Ok(Arc::new(PostgreSQLPatientStore::new(client)) as Arc<dyn PatientStore + Send + Sync>)
        }
    }
}
