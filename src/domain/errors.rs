//! Domain error types
//!
//! This module defines the error hierarchy for the patient service.
//! All errors are domain-specific and don't expose third-party types.

use crate::domain::ids::PatientId;
use thiserror::Error;

/// Main patient service error type
///
/// This is the primary error type used throughout the application.
/// It wraps adapter-specific error types and carries the two business
/// failures (`DuplicateEmail`, `NotFound`) that are detected before any mutation.
#[derive(Debug, Error)]
pub enum PatientError {
    /// Another patient already holds this email address
    #[error("Email address already in use: {0}")]
    DuplicateEmail(String),

    /// No patient exists with the given id
    #[error("Patient not found: {0}")]
    NotFound(PatientId),

    /// Record store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Billing provisioning errors
    #[error("Provisioning error: {0}")]
    Provisioning(#[from] ProvisioningError),

    /// Event emission errors
    #[error("Emission error: {0}")]
    Emission(#[from] EmissionError),

    /// Result cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl PatientError {
    /// Returns true for failures detected before any state was changed
    pub fn is_business_rejection(&self) -> bool {
        matches!(
            self,
            PatientError::DuplicateEmail(_) | PatientError::NotFound(_) | PatientError::Validation(_)
        )
    }
}

/// Record store errors
///
/// These errors don't expose the underlying database driver types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to connect to the store
    #[error("Failed to connect to record store: {0}")]
    ConnectionFailed(String),

    /// Failed to insert or update a record
    #[error("Failed to write record: {0}")]
    WriteFailed(String),

    /// Failed to read records
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Failed to delete a record
    #[error("Failed to delete record: {0}")]
    DeleteFailed(String),

    /// Schema creation or migration failed
    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be mapped to a patient
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

/// Billing provisioning errors
///
/// Cloneable so a failure can be carried in a partial-success result
/// and still be logged by the caller.
#[derive(Debug, Clone, Error)]
pub enum ProvisioningError {
    /// Billing service could not be reached
    #[error("Billing service unavailable: {0}")]
    Unavailable(String),

    /// Call did not complete within the per-attempt timeout
    #[error("Billing call timed out after {0} ms")]
    Timeout(u64),

    /// Billing service refused the request
    #[error("Billing service rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    /// Response could not be interpreted
    #[error("Invalid billing response: {0}")]
    InvalidResponse(String),

    /// Client-side setup failed (bad endpoint etc.)
    #[error("Billing client misconfigured: {0}")]
    Configuration(String),
}

impl ProvisioningError {
    /// Returns true if another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProvisioningError::Unavailable(_) | ProvisioningError::Timeout(_)
        )
    }
}

/// Event emission errors
#[derive(Debug, Clone, Error)]
pub enum EmissionError {
    /// Event bus could not be reached
    #[error("Event bus unavailable: {0}")]
    Unavailable(String),

    /// Publish did not complete within the per-attempt timeout
    #[error("Event publish timed out after {0} ms")]
    Timeout(u64),

    /// Server error (5xx)
    #[error("Event bus server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Event bus rejected event: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Event could not be encoded
    #[error("Failed to encode event: {0}")]
    Encoding(String),

    /// Client-side setup failed
    #[error("Event emitter misconfigured: {0}")]
    Configuration(String),
}

impl EmissionError {
    /// Returns true if another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            EmissionError::Unavailable(_)
            | EmissionError::Timeout(_)
            | EmissionError::ServerError { .. } => true,
            EmissionError::ClientError { status, .. } => *status == 429,
            EmissionError::Encoding(_) | EmissionError::Configuration(_) => false,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PatientError {
    fn from(err: std::io::Error) -> Self {
        PatientError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PatientError {
    fn from(err: serde_json::Error) -> Self {
        PatientError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PatientError {
    fn from(err: toml::de::Error) -> Self {
        PatientError::Configuration(format!("TOML parse error: {err}"))
    }
}
