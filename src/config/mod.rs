//! Configuration management for the patient service.
//!
//! The service reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PATIENT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation of every section on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use patient_service::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("patient-service.toml")?;
//!
//! println!("Billing endpoint: {}", config.billing.endpoint);
//! println!("Event topic: {}", config.events.topic);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`StoreConfig`] / [`PostgreSQLConfig`] - Record store selection and connection
//! - [`BillingConfig`] - Billing gRPC endpoint, timeout and retry
//! - [`EventsConfig`] - Event bus target, topic, credentials and retry
//! - [`CacheConfig`] - List result cache TTL and size
//! - [`QueryConfig`] - Page size limits
//! - [`RelayConfig`] - Background completion of pending side effects
//! - [`SecurityConfig`] - Password hashing cost
//! - [`LoggingConfig`] - Console and rolling file logging
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [store]
//! target = "postgresql"
//!
//! [postgresql]
//! connection_string = "${PATIENT_DB_URL}"
//!
//! [billing]
//! endpoint = "http://billing-service:9001"
//!
//! [events]
//! target = "kafka_rest"
//! base_url = "http://kafka-rest:8082"
//! topic = "patient"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, BillingConfig, CacheConfig, Environment, EventTarget, EventsConfig,
    LoggingConfig, PatientServiceConfig, PostgreSQLConfig, QueryConfig, RelayConfig, RetryConfig,
    SecurityConfig, StoreConfig, StoreTarget,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
