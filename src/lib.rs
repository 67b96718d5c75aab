// Patient Service - Patient records with billing provisioning and event emission
// Copyright (c) 2025 Patient Service Contributors
// Licensed under the MIT License

//! # Patient Service
//!
//! Patient record management with ordered post-write side effects: every new
//! patient is persisted, then provisioned in the billing service over gRPC,
//! then announced on the event bus.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Orchestrator, side-effect relay, retry policy
//! - [`adapters`] - Record store, billing client, event emitters, result cache
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`security`] - Password hashing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patient_service::config::load_config;
//! use patient_service::core::patients::PatientOrchestrator;
//! use patient_service::domain::{ListQuery, PatientRequest};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("patient-service.toml")?;
//!     let orchestrator = PatientOrchestrator::from_config(&config).await?;
//!
//!     let dob = NaiveDate::from_ymd_opt(1990, 1, 1).ok_or("bad date")?;
//!     let created = orchestrator
//!         .create_patient(PatientRequest::new("Alice", "a@x.com", "1 Main St", dob))
//!         .await?;
//!     println!("Created {} (complete: {})", created.patient.id, created.is_complete());
//!
//!     let page = orchestrator
//!         .list_patients(&ListQuery::new(1, 10).sorted_by("asc", "name"))
//!         .await?;
//!     println!("{} of {} patients", page.patients.len(), page.total_elements);
//!     Ok(())
//! }
//! ```
//!
//! ## Consistency
//!
//! There is no transaction spanning the store write and the remote calls.
//! A created patient is durable even when billing or the event bus fail; the
//! incomplete steps are returned as warnings and recorded as pending markers
//! on the patient, which the relay ([`core::relay`]) later completes.
//! Provisioning is at-least-once, keyed by patient id.
//!
//! ## Error Handling
//!
//! All library operations return [`domain::Result`], whose error type is
//! [`domain::PatientError`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod security;
