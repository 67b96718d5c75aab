//! PostgreSQL record store
//!
//! Patients live in a single `patients` table; the schema is applied from
//! `migrations/001_patients.sql` on startup.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLPatientStore;
pub use client::PostgreSQLClient;
