//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Patient identifier newtype wrapper
///
/// Opaque, generated once at creation and never changed afterwards.
///
/// # Examples
///
/// ```
/// use patient_service::domain::ids::PatientId;
/// use std::str::FromStr;
///
/// let id = PatientId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(id.to_string(), "7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(Uuid);

impl PatientId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parses an identifier from its hyphenated string form
    ///
    /// # Errors
    ///
    /// Returns an error message if the value is empty or not a UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, String> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|e| format!("Invalid patient ID '{id}': {e}"))
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Consumes self and returns the inner UUID
    pub fn into_inner(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<Uuid> for PatientId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}
