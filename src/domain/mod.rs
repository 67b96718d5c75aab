//! Domain models and types for the patient service.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`])
//! - **Domain models** ([`Patient`], [`BillingAccount`], [`PatientCreatedEvent`])
//! - **Paging types** ([`ListQuery`], [`PageRequest`], [`Page`], [`PagedPatients`])
//! - **Creation outcome** ([`CreatedPatient`], [`CreationWarning`])
//! - **Error types** ([`PatientError`], [`StorageError`], [`ProvisioningError`], [`EmissionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PatientError>`]:
//!
//! ```rust
//! use patient_service::domain::{PatientError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = patient_service::config::load_config("patient-service.toml")?;
//!     Ok(())
//! }
//! ```

pub mod billing;
pub mod errors;
pub mod event;
pub mod ids;
pub mod outcome;
pub mod page;
pub mod patient;
pub mod result;

// Re-export commonly used types for convenience
pub use billing::BillingAccount;
pub use errors::{EmissionError, PatientError, ProvisioningError, StorageError};
pub use event::PatientCreatedEvent;
pub use ids::PatientId;
pub use outcome::{CreatedPatient, CreationWarning, SideEffectStep};
pub use page::{ListQuery, Page, PageRequest, PagedPatients, Sort, SortDirection, SortField};
pub use patient::{Patient, PatientRequest, PatientResponse};
pub use result::Result;
