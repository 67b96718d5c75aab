//! PostgreSQL row mapping for the `patients` table

use crate::domain::{BillingAccount, Patient, PatientId, Result, SortDirection, SortField, StorageError};
use chrono::{DateTime, NaiveDate, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

/// Column list used by every SELECT and RETURNING clause
pub const PATIENT_COLUMNS: &str = "id, name, email, address, date_of_birth, created_at, \
     billing_account_id, billing_account_status, event_published";

/// Maps a `patients` row to a domain patient
pub fn patient_from_row(row: &Row) -> Result<Patient> {
    let id: Uuid = get(row, "id")?;
    let name: String = get(row, "name")?;
    let email: String = get(row, "email")?;
    let address: String = get(row, "address")?;
    let date_of_birth: NaiveDate = get(row, "date_of_birth")?;
    let created_at: DateTime<Utc> = get(row, "created_at")?;
    let account_id: Option<String> = get(row, "billing_account_id")?;
    let account_status: Option<String> = get(row, "billing_account_status")?;
    let event_published: bool = get(row, "event_published")?;

    let billing_account = account_id.map(|account_id| {
        BillingAccount::new(account_id, account_status.unwrap_or_default())
    });

    Ok(Patient {
        id: PatientId::from_uuid(id),
        name,
        email,
        address,
        date_of_birth,
        created_at,
        billing_account,
        event_published,
    })
}

fn get<'a, T>(row: &'a Row, column: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(column).map_err(|e| {
        StorageError::InvalidRecord(format!("column '{column}': {e}")).into()
    })
}

/// Column backing an allow-listed sort field
pub fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Name => "name",
        SortField::Email => "email",
        SortField::Address => "address",
        SortField::DateOfBirth => "date_of_birth",
        SortField::CreatedAt => "created_at",
    }
}

pub fn sort_keyword(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

/// Builds an ILIKE pattern matching `term` anywhere, with wildcards in the term escaped
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
