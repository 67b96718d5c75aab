//! Patient domain model
//!
//! This module defines the patient record, the request shape used to create
//! or overwrite one, and the response projection returned to callers.

use super::billing::BillingAccount;
use super::ids::PatientId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A persisted patient record
///
/// The profile fields (`name`, `email`, `address`, `date_of_birth`) are owned by
/// the caller and overwritten on update. `billing_account` and `event_published`
/// are side-effect markers written only after the corresponding remote step succeeds.
///
/// # Examples
///
/// ```
/// use patient_service::domain::patient::{Patient, PatientRequest};
/// use chrono::NaiveDate;
///
/// let request = PatientRequest::new(
///     "Alice",
///     "a@x.com",
///     "1 Main St",
///     NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
/// );
/// let patient = Patient::create(request);
/// assert_eq!(patient.name, "Alice");
/// assert!(patient.billing_account.is_none());
/// assert!(!patient.event_published);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Unique identifier, generated at creation
    pub id: PatientId,

    /// Full name
    pub name: String,

    /// Email address, unique across all patients
    pub email: String,

    /// Postal address
    pub address: String,

    /// Date of birth
    pub date_of_birth: NaiveDate,

    /// When the record was first persisted
    pub created_at: DateTime<Utc>,

    /// Billing account returned by the provisioner, once provisioned
    pub billing_account: Option<BillingAccount>,

    /// Whether the creation event has been published
    pub event_published: bool,
}

impl Patient {
    /// Builds a new patient from a request with a freshly generated id
    pub fn create(request: PatientRequest) -> Self {
        Self::with_id(PatientId::generate(), request, Utc::now())
    }

    /// Builds a patient with an explicit id and creation time
    pub fn with_id(id: PatientId, request: PatientRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: request.name,
            email: request.email,
            address: request.address,
            date_of_birth: request.date_of_birth,
            created_at,
            billing_account: None,
            event_published: false,
        }
    }

    /// Overwrites all four profile fields from the request
    pub fn apply(&mut self, request: PatientRequest) {
        self.name = request.name;
        self.email = request.email;
        self.address = request.address;
        self.date_of_birth = request.date_of_birth;
    }

    /// Returns true while billing provisioning or event emission is outstanding
    pub fn has_pending_side_effects(&self) -> bool {
        self.billing_account.is_none() || !self.event_published
    }

    /// Projects the record to its response shape
    pub fn to_response(&self) -> PatientResponse {
        PatientResponse::from(self)
    }
}

/// Caller-supplied profile fields for create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
}

impl PatientRequest {
    /// Creates a new request
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            address: address.into(),
            date_of_birth,
        }
    }
}

/// Response projection of a patient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: String,
}

impl From<&Patient> for PatientResponse {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id.to_string(),
            name: patient.name.clone(),
            email: patient.email.clone(),
            address: patient.address.clone(),
            date_of_birth: patient.date_of_birth.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self::from(&patient)
    }
}
