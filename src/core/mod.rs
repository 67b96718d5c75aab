//! Core business logic for the patient service.
//!
//! # Modules
//!
//! - [`patients`] - Patient orchestrator: create, update, delete and list
//! - [`relay`] - Background completion of pending side effects
//! - [`retry`] - Bounded retry with exponential backoff for remote calls
//!
//! # Creation Workflow
//!
//! 1. **Uniqueness check**: reject a registered email before any write
//! 2. **Persist**: write the patient with a fresh id
//! 3. **Provision**: create the billing account and record it on the patient
//! 4. **Emit**: publish the creation event and record that it was published
//!
//! Steps 3 and 4 never undo step 2. Anything left incomplete is reported as a
//! warning and later finished by the relay.

pub mod patients;
pub mod relay;
pub mod retry;
