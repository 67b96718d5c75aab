//! External system integrations for the patient service.
//!
//! - [`store`] - Record store abstraction, in-memory store and factory
//! - [`postgresql`] - PostgreSQL record store
//! - [`billing`] - Billing provisioner gRPC client
//! - [`events`] - Event emitters (Kafka REST proxy, in-process channel)
//! - [`cache`] - Result cache for browse queries
//!
//! # Design Pattern
//!
//! Each collaborator sits behind an `async_trait` so the orchestrator can be
//! wired to real services or to test doubles. Adapters make a single attempt
//! per call; retry and timeouts are applied by [`crate::core::retry`].

pub mod billing;
pub mod cache;
pub mod events;
pub mod postgresql;
pub mod store;
