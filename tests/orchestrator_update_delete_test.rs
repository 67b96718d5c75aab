//! Integration tests for update and delete

mod common;

use chrono::NaiveDate;
use common::{request, Harness};
use patient_service::adapters::store::PatientStore;
use patient_service::domain::{ListQuery, PatientError, PatientId, PatientRequest};

#[tokio::test]
async fn test_update_overwrites_all_fields() {
    let h = Harness::new();
    let created = h
        .orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();
    let id = created.patient.id;

    let dob = NaiveDate::from_ymd_opt(1991, 2, 3).unwrap();
    let updated = h
        .orchestrator
        .update_patient(&id, PatientRequest::new("Alicia", "alicia@x.com", "9 New Rd", dob))
        .await
        .unwrap();

    assert_eq!(updated.id, id.to_string());
    assert_eq!(updated.name, "Alicia");
    assert_eq!(updated.email, "alicia@x.com");
    assert_eq!(updated.address, "9 New Rd");
    assert_eq!(updated.date_of_birth, "1991-02-03");

    let stored = h.store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Alicia");
    assert_eq!(stored.date_of_birth, dob);
}

#[tokio::test]
async fn test_update_keeps_side_effect_markers() {
    let h = Harness::new();
    let created = h
        .orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();

    h.orchestrator
        .update_patient(&created.patient.id, request("Alice B", "a@x.com"))
        .await
        .unwrap();

    let stored = h.store.find_by_id(&created.patient.id).await.unwrap().unwrap();
    assert_eq!(stored.billing_account, created.billing_account);
    assert!(stored.event_published);
    assert_eq!(h.billing.calls(), 1);
    assert_eq!(h.events.published().len(), 1);
}

#[tokio::test]
async fn test_update_with_own_email_succeeds() {
    let h = Harness::new();
    let created = h
        .orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();

    let updated = h
        .orchestrator
        .update_patient(&created.patient.id, request("Alice Renamed", "a@x.com"))
        .await
        .unwrap();

    assert_eq!(updated.name, "Alice Renamed");
}

#[tokio::test]
async fn test_update_with_another_patients_email_is_rejected() {
    let h = Harness::new();
    h.orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();
    let bob = h
        .orchestrator
        .create_patient(request("Bob", "bob@x.com"))
        .await
        .unwrap();

    let err = h
        .orchestrator
        .update_patient(&bob.patient.id, request("Bob", "a@x.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, PatientError::DuplicateEmail(_)));
    let stored = h.store.find_by_id(&bob.patient.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "bob@x.com");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let h = Harness::new();
    let id = PatientId::generate();

    let err = h
        .orchestrator
        .update_patient(&id, request("Nobody", "nobody@x.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, PatientError::NotFound(missing) if missing == id));
    assert_eq!(h.store.saves(), 0);
}

#[tokio::test]
async fn test_delete_removes_patient() {
    let h = Harness::new();
    let created = h
        .orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();

    h.orchestrator
        .delete_patient(&created.patient.id)
        .await
        .unwrap();

    assert!(h.store.find_by_id(&created.patient.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_unknown_id_succeeds() {
    let h = Harness::new();
    assert!(h
        .orchestrator
        .delete_patient(&PatientId::generate())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_email_is_reusable_after_delete() {
    let h = Harness::new();
    let created = h
        .orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();
    h.orchestrator
        .delete_patient(&created.patient.id)
        .await
        .unwrap();

    assert!(h
        .orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_mutations_invalidate_cached_pages() {
    let h = Harness::new();
    let created = h
        .orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();
    let query = ListQuery::new(1, 10);

    h.orchestrator.list_patients(&query).await.unwrap();
    h.orchestrator
        .update_patient(&created.patient.id, request("Alicia", "a@x.com"))
        .await
        .unwrap();
    let after_update = h.orchestrator.list_patients(&query).await.unwrap();
    assert_eq!(after_update.patients[0].name, "Alicia");

    h.orchestrator
        .delete_patient(&created.patient.id)
        .await
        .unwrap();
    let after_delete = h.orchestrator.list_patients(&query).await.unwrap();
    assert_eq!(after_delete.total_elements, 0);

    assert_eq!(h.store.page_queries(), 3);
}
