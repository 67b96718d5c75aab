//! In-memory patient store
//!
//! Backs development runs and tests. Enforces the same email uniqueness the
//! PostgreSQL schema does.

use super::traits::PatientStore;
use crate::domain::{
    BillingAccount, Page, PageRequest, Patient, PatientError, PatientId, Result, SortDirection,
    SortField,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Patient store held in process memory
#[derive(Default)]
pub struct InMemoryPatientStore {
    patients: RwLock<HashMap<PatientId, Patient>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored patients
    pub async fn len(&self) -> usize {
        self.patients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.patients.read().await.is_empty()
    }

    fn paginate(mut matches: Vec<Patient>, request: &PageRequest) -> Page<Patient> {
        matches.sort_by(|a, b| compare(a, b, request.sort.field, request.sort.direction));

        let total = matches.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = matches
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .collect();

        Page::new(content, request, total)
    }
}

fn compare(a: &Patient, b: &Patient, field: SortField, direction: SortDirection) -> Ordering {
    let primary = match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Email => a.email.cmp(&b.email),
        SortField::Address => a.address.cmp(&b.address),
        SortField::DateOfBirth => a.date_of_birth.cmp(&b.date_of_birth),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    let primary = match direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let patients = self.patients.read().await;
        Ok(patients.values().any(|p| p.email == email))
    }

    async fn exists_by_email_and_id_not(&self, email: &str, id: &PatientId) -> Result<bool> {
        let patients = self.patients.read().await;
        Ok(patients.values().any(|p| p.email == email && p.id != *id))
    }

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>> {
        Ok(self.patients.read().await.get(id).cloned())
    }

    async fn save(&self, patient: &Patient) -> Result<Patient> {
        let mut patients = self.patients.write().await;

        if patients
            .values()
            .any(|p| p.email == patient.email && p.id != patient.id)
        {
            return Err(PatientError::DuplicateEmail(patient.email.clone()));
        }

        let stored = match patients.get_mut(&patient.id) {
            Some(existing) => {
                existing.name = patient.name.clone();
                existing.email = patient.email.clone();
                existing.address = patient.address.clone();
                existing.date_of_birth = patient.date_of_birth;
                existing.clone()
            }
            None => {
                patients.insert(patient.id, patient.clone());
                patient.clone()
            }
        };

        Ok(stored)
    }

    async fn delete_by_id(&self, id: &PatientId) -> Result<()> {
        self.patients.write().await.remove(id);
        Ok(())
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Patient>> {
        let matches: Vec<Patient> = self.patients.read().await.values().cloned().collect();
        Ok(Self::paginate(matches, request))
    }

    async fn find_page_by_name_containing(
        &self,
        term: &str,
        request: &PageRequest,
    ) -> Result<Page<Patient>> {
        let needle = term.to_lowercase();
        let matches: Vec<Patient> = self
            .patients
            .read()
            .await
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::paginate(matches, request))
    }

    async fn find_pending_side_effects(
        &self,
        created_before: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Patient>> {
        let mut pending: Vec<Patient> = self
            .patients
            .read()
            .await
            .values()
            .filter(|p| p.created_at < created_before && p.has_pending_side_effects())
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        pending.truncate(limit);
        Ok(pending)
    }

    async fn mark_provisioned(&self, id: &PatientId, account: &BillingAccount) -> Result<bool> {
        let mut patients = self.patients.write().await;
        Ok(match patients.get_mut(id) {
            Some(patient) => {
                patient.billing_account = Some(account.clone());
                true
            }
            None => false,
        })
    }

    async fn mark_event_published(&self, id: &PatientId) -> Result<bool> {
        let mut patients = self.patients.write().await;
        Ok(match patients.get_mut(id) {
            Some(patient) => {
                patient.event_published = true;
                true
            }
            None => false,
        })
    }
}
