//! PostgreSQL implementation of the patient store

use crate::adapters::postgresql::client::{is_unique_violation, PostgreSQLClient};
use crate::adapters::postgresql::models::{
    contains_pattern, patient_from_row, sort_column, sort_keyword, PATIENT_COLUMNS,
};
use crate::adapters::store::PatientStore;
use crate::domain::{
    BillingAccount, Page, PageRequest, Patient, PatientError, PatientId, Result, StorageError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// PostgreSQL-backed [`PatientStore`]
pub struct PostgreSQLPatientStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLPatientStore {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn new_with_arc(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    fn order_by(request: &PageRequest) -> String {
        format!(
            "ORDER BY {} {}, id ASC",
            sort_column(request.sort.field),
            sort_keyword(request.sort.direction)
        )
    }

    async fn count(&self, filter: &str, params: &[&(dyn tokio_postgres::types::ToSql + Sync)]) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) AS total FROM patients {filter}");
        let rows = self.client.query(&sql, params).await?;
        let total: i64 = rows
            .first()
            .map(|row| row.try_get("total"))
            .transpose()
            .map_err(|e| StorageError::QueryFailed(format!("Failed to read count: {e}")))?
            .unwrap_or(0);
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn exists(&self, sql: &str, params: &[&(dyn tokio_postgres::types::ToSql + Sync)]) -> Result<bool> {
        let rows = self.client.query(sql, params).await?;
        Ok(!rows.is_empty())
    }

    async fn fetch_page(
        &self,
        filter: &str,
        filter_param: Option<&String>,
        request: &PageRequest,
    ) -> Result<Page<Patient>> {
        let limit = i64::from(request.size);
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);

        let (rows, total) = match filter_param {
            Some(pattern) => {
                let sql = format!(
                    "SELECT {PATIENT_COLUMNS} FROM patients {filter} {} LIMIT $2 OFFSET $3",
                    Self::order_by(request)
                );
                let rows = self.client.query(&sql, &[pattern, &limit, &offset]).await?;
                let total = self.count(filter, &[pattern]).await?;
                (rows, total)
            }
            None => {
                let sql = format!(
                    "SELECT {PATIENT_COLUMNS} FROM patients {} LIMIT $1 OFFSET $2",
                    Self::order_by(request)
                );
                let rows = self.client.query(&sql, &[&limit, &offset]).await?;
                let total = self.count("", &[]).await?;
                (rows, total)
            }
        };

        let content = rows
            .iter()
            .map(patient_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(content, request, total))
    }
}

#[async_trait]
impl PatientStore for PostgreSQLPatientStore {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        self.exists("SELECT 1 FROM patients WHERE email = $1 LIMIT 1", &[&email])
            .await
    }

    async fn exists_by_email_and_id_not(&self, email: &str, id: &PatientId) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM patients WHERE email = $1 AND id <> $2 LIMIT 1",
            &[&email, id.as_uuid()],
        )
        .await
    }

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>> {
        let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1");
        let rows = self.client.query(&sql, &[id.as_uuid()]).await?;
        rows.first().map(patient_from_row).transpose()
    }

    async fn save(&self, patient: &Patient) -> Result<Patient> {
        let sql = format!(
            "INSERT INTO patients (id, name, email, address, date_of_birth, created_at, \
             billing_account_id, billing_account_status, event_published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (id) DO UPDATE SET \
             name = EXCLUDED.name, email = EXCLUDED.email, address = EXCLUDED.address, \
             date_of_birth = EXCLUDED.date_of_birth, updated_at = NOW() \
             RETURNING {PATIENT_COLUMNS}"
        );

        let account_id = patient.billing_account.as_ref().map(|a| a.account_id.as_str());
        let account_status = patient.billing_account.as_ref().map(|a| a.status.as_str());

        let email = patient.email.clone();
        let rows = self
            .client
            .query_with(
                &sql,
                &[
                    patient.id.as_uuid(),
                    &patient.name,
                    &patient.email,
                    &patient.address,
                    &patient.date_of_birth,
                    &patient.created_at,
                    &account_id,
                    &account_status,
                    &patient.event_published,
                ],
                move |e| {
                    if is_unique_violation(&e) {
                        PatientError::DuplicateEmail(email)
                    } else {
                        StorageError::WriteFailed(e.to_string()).into()
                    }
                },
            )
            .await?;

        let row = rows.first().ok_or_else(|| {
            StorageError::WriteFailed(format!("No row returned when saving patient {}", patient.id))
        })?;
        patient_from_row(row)
    }

    async fn delete_by_id(&self, id: &PatientId) -> Result<()> {
        let deleted = self
            .client
            .execute("DELETE FROM patients WHERE id = $1", &[id.as_uuid()])
            .await
            .map_err(|e| match e {
                PatientError::Storage(StorageError::WriteFailed(msg)) => {
                    StorageError::DeleteFailed(msg).into()
                }
                other => other,
            })?;
        tracing::debug!(patient_id = %id, deleted, "Delete executed");
        Ok(())
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Patient>> {
        self.fetch_page("", None, request).await
    }

    async fn find_page_by_name_containing(
        &self,
        term: &str,
        request: &PageRequest,
    ) -> Result<Page<Patient>> {
        let pattern = contains_pattern(term);
        self.fetch_page("WHERE name ILIKE $1 ESCAPE '\\'", Some(&pattern), request)
            .await
    }

    async fn find_pending_side_effects(
        &self,
        created_before: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Patient>> {
        let sql = format!(
            "SELECT {PATIENT_COLUMNS} FROM patients \
             WHERE created_at < $1 AND (billing_account_id IS NULL OR event_published = FALSE) \
             ORDER BY created_at ASC, id ASC LIMIT $2"
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self.client.query(&sql, &[&created_before, &limit]).await?;
        rows.iter().map(patient_from_row).collect()
    }

    async fn mark_provisioned(&self, id: &PatientId, account: &BillingAccount) -> Result<bool> {
        let updated = self
            .client
            .execute(
                "UPDATE patients SET billing_account_id = $2, billing_account_status = $3, \
                 updated_at = NOW() WHERE id = $1",
                &[id.as_uuid(), &account.account_id, &account.status],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn mark_event_published(&self, id: &PatientId) -> Result<bool> {
        let updated = self
            .client
            .execute(
                "UPDATE patients SET event_published = TRUE, updated_at = NOW() WHERE id = $1",
                &[id.as_uuid()],
            )
            .await?;
        Ok(updated > 0)
    }
}
