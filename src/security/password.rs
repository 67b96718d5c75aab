//! Password hashing
//!
//! Thin wrappers over bcrypt with an explicit cost parameter.

use crate::domain::{PatientError, Result};

/// Lowest bcrypt cost accepted
pub const MIN_COST: u32 = 4;

/// Highest bcrypt cost accepted
pub const MAX_COST: u32 = 31;

/// Hash `plain` with bcrypt at the given cost
///
/// # Errors
///
/// Returns `PatientError::Validation` if `cost` is outside 4..=31.
pub fn hash_password(plain: &str, cost: u32) -> Result<String> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(PatientError::Validation(format!(
            "bcrypt cost must be between {MIN_COST} and {MAX_COST}, got {cost}"
        )));
    }

    bcrypt::hash(plain, cost).map_err(|e| PatientError::Other(format!("Failed to hash password: {e}")))
}

/// Check `plain` against a bcrypt hash
///
/// A malformed hash never matches.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    match bcrypt::verify(plain, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::debug!(error = %e, "Password hash could not be parsed");
            false
        }
    }
}
