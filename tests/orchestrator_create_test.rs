//! Integration tests for the patient creation workflow

mod common;

use common::{fake_request, request, Harness};
use patient_service::adapters::store::PatientStore;
use patient_service::domain::{CreationWarning, ListQuery, PatientError, ProvisioningError};

#[tokio::test]
async fn test_create_runs_every_side_effect_once() {
    let h = Harness::new();

    let created = h
        .orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();

    assert!(created.is_complete());
    assert!(!created.patient.id.to_string().is_empty());
    assert!(created.event_published);
    assert_eq!(
        created.billing_account.as_ref().map(|a| a.account_id.clone()),
        Some(format!("acct-{}", created.patient.id))
    );

    assert_eq!(h.billing.calls(), 1);
    assert_eq!(
        h.billing.patient_ids.lock().unwrap().as_slice(),
        &[created.patient.id]
    );

    let events = h.events.published();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].patient_id, created.patient.id);
    assert_eq!(events[0].name, "Alice");
    assert_eq!(events[0].email, "a@x.com");
}

#[tokio::test]
async fn test_created_patient_is_readable_with_submitted_fields() {
    let h = Harness::new();
    let submitted = fake_request(1);

    let created = h
        .orchestrator
        .create_patient(submitted.clone())
        .await
        .unwrap();

    let stored = h
        .store
        .find_by_id(&created.patient.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, submitted.name);
    assert_eq!(stored.email, submitted.email);
    assert_eq!(stored.address, submitted.address);
    assert_eq!(stored.date_of_birth, submitted.date_of_birth);
    assert!(stored.billing_account.is_some());
    assert!(stored.event_published);
}

#[tokio::test]
async fn test_each_create_gets_a_fresh_id() {
    let h = Harness::new();

    let first = h.orchestrator.create_patient(fake_request(1)).await.unwrap();
    let second = h.orchestrator.create_patient(fake_request(2)).await.unwrap();

    assert_ne!(first.patient.id, second.patient.id);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_without_side_effects() {
    let h = Harness::new();
    h.orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();

    let saves = h.store.saves();
    let billing_calls = h.billing.calls();
    let events = h.events.published().len();

    let err = h
        .orchestrator
        .create_patient(request("Alice Again", "a@x.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, PatientError::DuplicateEmail(ref email) if email == "a@x.com"));
    assert!(err.is_business_rejection());
    assert_eq!(h.store.saves(), saves);
    assert_eq!(h.billing.calls(), billing_calls);
    assert_eq!(h.events.published().len(), events);
    assert_eq!(h.store.inner.len().await, 1);
}

#[tokio::test]
async fn test_transient_billing_failures_are_retried() {
    let h = Harness::new();
    h.billing.fail_next(2);

    let created = h
        .orchestrator
        .create_patient(request("Bob", "bob@x.com"))
        .await
        .unwrap();

    assert!(created.is_complete());
    assert_eq!(h.billing.calls(), 3);
    assert_eq!(h.events.published().len(), 1);
}

#[tokio::test]
async fn test_billing_rejection_keeps_patient_and_defers_event() {
    let h = Harness::new();
    h.billing.set_reject(true);

    let created = h
        .orchestrator
        .create_patient(request("Carol", "carol@x.com"))
        .await
        .unwrap();

    assert!(!created.is_complete());
    assert!(created.billing_account.is_none());
    assert!(!created.event_published);
    assert!(matches!(
        created.warnings.as_slice(),
        [
            CreationWarning::ProvisioningFailed(ProvisioningError::Rejected { .. }),
            CreationWarning::EmissionDeferred
        ]
    ));

    // Rejections are not retried
    assert_eq!(h.billing.calls(), 1);
    assert!(h.events.published().is_empty());

    let stored = h
        .store
        .find_by_id(&created.patient.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.has_pending_side_effects());
}

#[tokio::test]
async fn test_event_failure_keeps_billing_account() {
    let h = Harness::new();
    h.events.set_fail(true);

    let created = h
        .orchestrator
        .create_patient(request("Dan", "dan@x.com"))
        .await
        .unwrap();

    assert!(created.billing_account.is_some());
    assert!(!created.event_published);
    assert!(matches!(
        created.warnings.as_slice(),
        [CreationWarning::EmissionFailed(_)]
    ));
    assert_eq!(
        h.events.attempts.load(std::sync::atomic::Ordering::SeqCst),
        3
    );

    let stored = h
        .store
        .find_by_id(&created.patient.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.billing_account.is_some());
    assert!(!stored.event_published);
}

#[tokio::test]
async fn test_create_invalidates_cached_pages() {
    let h = Harness::new();
    h.orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await
        .unwrap();

    let before = h.orchestrator.list_patients(&ListQuery::new(1, 10)).await.unwrap();
    assert_eq!(before.total_elements, 1);

    h.orchestrator
        .create_patient(request("Bob", "bob@x.com"))
        .await
        .unwrap();

    let after = h.orchestrator.list_patients(&ListQuery::new(1, 10)).await.unwrap();
    assert_eq!(after.total_elements, 2);
    assert_eq!(h.store.page_queries(), 2);
}

#[tokio::test]
async fn test_persist_failure_skips_side_effects() {
    let h = Harness::new();
    h.store.set_fail_saves(true);

    let result = h
        .orchestrator
        .create_patient(request("Alice", "a@x.com"))
        .await;

    assert!(matches!(result, Err(PatientError::Storage(_))));
    assert_eq!(h.billing.calls(), 0);
    assert_eq!(h.events.attempts.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert!(h.events.published().is_empty());
    assert!(!h.store.exists_by_email("a@x.com").await.unwrap());
}
