//! Result type alias for the patient service

use super::errors::PatientError;

/// Result type alias for patient service operations
///
/// # Examples
///
/// ```
/// use patient_service::domain::result::Result;
/// use patient_service::domain::errors::PatientError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PatientError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PatientError>;
