//! Logging and observability
//!
//! Structured logging via `tracing`, with:
//! - Console output
//! - Optional JSON file output with rotation
//! - Helper macros for the events the orchestrator and relay emit repeatedly
//!
//! # Example
//!
//! ```no_run
//! use patient_service::logging::init_logging;
//! use patient_service::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Service started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use patient_service::log_error_with_context;
/// use patient_service::domain::PatientError;
///
/// let error = PatientError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use patient_service::log_retry_attempt;
///
/// log_retry_attempt!("billing.create_account", 2, 4, "Billing service unavailable");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($operation:expr, $attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            operation = $operation,
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying operation"
        );
    };
}

/// Log a post-persist step that did not complete
///
/// # Example
///
/// ```no_run
/// use patient_service::log_side_effect_failure;
/// use patient_service::domain::{PatientId, SideEffectStep};
///
/// let id = PatientId::generate();
/// log_side_effect_failure!(&id, SideEffectStep::Provisioning, "Billing call timed out");
/// ```
#[macro_export]
macro_rules! log_side_effect_failure {
    ($patient_id:expr, $step:expr, $error:expr) => {
        tracing::warn!(
            patient_id = %$patient_id,
            step = %$step,
            error = %$error,
            "Side effect incomplete, left for relay"
        );
    };
}
