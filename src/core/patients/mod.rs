//! Patient orchestration
//!
//! - [`orchestrator`] - create, update and delete workflows
//! - [`query`] - cached browse and uncached search
//! - [`side_effects`] - billing provisioning and event emission after persist
//!
//! # Example
//!
//! ```rust,no_run
//! use patient_service::config::load_config;
//! use patient_service::core::patients::PatientOrchestrator;
//! use patient_service::domain::{ListQuery, PatientRequest};
//! use chrono::NaiveDate;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("patient-service.toml")?;
//! let orchestrator = PatientOrchestrator::from_config(&config).await?;
//!
//! let dob = NaiveDate::from_ymd_opt(1990, 1, 1).ok_or("bad date")?;
//! let created = orchestrator
//!     .create_patient(PatientRequest::new("Alice", "a@x.com", "1 Main St", dob))
//!     .await?;
//! for warning in &created.warnings {
//!     println!("incomplete: {warning}");
//! }
//!
//! let page = orchestrator.list_patients(&ListQuery::new(1, 10)).await?;
//! println!("{} patients", page.total_elements);
//! # Ok(())
//! # }
//! ```

pub mod orchestrator;
pub mod query;
pub mod side_effects;

pub use orchestrator::{OrchestratorSettings, PatientOrchestrator};
pub use side_effects::{SideEffectDriver, SideEffectOutcome};
