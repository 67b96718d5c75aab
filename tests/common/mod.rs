//! Shared test doubles for orchestrator and relay integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use patient_service::adapters::billing::BillingProvisioner;
use patient_service::adapters::cache::{CacheKey, InMemoryResultCache, ResultCache};
use patient_service::adapters::events::EventEmitter;
use patient_service::adapters::store::{InMemoryPatientStore, PatientStore};
use patient_service::config::RelayConfig;
use patient_service::core::patients::{OrchestratorSettings, PatientOrchestrator, SideEffectDriver};
use patient_service::core::relay::SideEffectRelay;
use patient_service::core::retry::RetryPolicy;
use patient_service::domain::{
    BillingAccount, EmissionError, Page, PageRequest, PagedPatients, Patient, PatientCreatedEvent,
    PatientError, PatientId, PatientRequest, ProvisioningError, Result, StorageError,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Billing double that records calls and can fail on demand
#[derive(Default)]
pub struct RecordingBilling {
    pub calls: AtomicUsize,
    pub patient_ids: Mutex<Vec<PatientId>>,
    /// Next N calls fail with a retryable error
    pub transient_failures: AtomicUsize,
    /// Every call is rejected
    pub reject: AtomicBool,
}

impl RecordingBilling {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self, times: usize) {
        self.transient_failures.store(times, Ordering::SeqCst);
    }

    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl BillingProvisioner for RecordingBilling {
    async fn create_billing_account(
        &self,
        patient_id: &PatientId,
        _name: &str,
        _email: &str,
    ) -> std::result::Result<BillingAccount, ProvisioningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.patient_ids.lock().unwrap().push(*patient_id);

        if self.reject.load(Ordering::SeqCst) {
            return Err(ProvisioningError::Rejected {
                code: "FailedPrecondition".to_string(),
                message: "billing closed".to_string(),
            });
        }
        let pending = self.transient_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.transient_failures.store(pending - 1, Ordering::SeqCst);
            return Err(ProvisioningError::Unavailable("billing down".to_string()));
        }

        Ok(BillingAccount::new(format!("acct-{patient_id}"), "ACTIVE"))
    }
}

/// Event emitter double that keeps every published event
#[derive(Default)]
pub struct RecordingEmitter {
    pub events: Mutex<Vec<PatientCreatedEvent>>,
    pub attempts: AtomicUsize,
    pub fail: AtomicBool,
}

impl RecordingEmitter {
    pub fn published(&self) -> Vec<PatientCreatedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventEmitter for RecordingEmitter {
    fn target_name(&self) -> &'static str {
        "recording"
    }

    async fn publish(&self, event: &PatientCreatedEvent) -> std::result::Result<(), EmissionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmissionError::ServerError {
                status: 503,
                message: "bus down".to_string(),
            });
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Handles for a page query held open after it has read the store
pub struct PausedPageQuery {
    /// Resolves once the query has read its rows
    pub read_done: oneshot::Receiver<()>,
    /// Lets the query return
    pub release: oneshot::Sender<()>,
}

/// In-memory store that counts writes and page queries
#[derive(Default)]
pub struct CountingStore {
    pub inner: InMemoryPatientStore,
    pub saves: AtomicUsize,
    pub page_queries: AtomicUsize,
    pub search_queries: AtomicUsize,
    /// Every save fails with a write error
    pub fail_saves: AtomicBool,
    /// The patient is deleted just before its billing marker is written
    pub delete_on_provision: AtomicBool,
    page_pause: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

impl CountingStore {
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn set_delete_on_provision(&self, delete: bool) {
        self.delete_on_provision.store(delete, Ordering::SeqCst);
    }

    /// Hold the next `find_page` open between reading and returning
    pub fn pause_next_page_query(&self) -> PausedPageQuery {
        let (done_tx, read_done) = oneshot::channel();
        let (release, release_rx) = oneshot::channel();
        *self.page_pause.lock().unwrap() = Some((done_tx, release_rx));
        PausedPageQuery { read_done, release }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn page_queries(&self) -> usize {
        self.page_queries.load(Ordering::SeqCst)
    }

    pub fn search_queries(&self) -> usize {
        self.search_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PatientStore for CountingStore {
    fn backend_name(&self) -> &'static str {
        "counting"
    }

    async fn test_connection(&self) -> Result<()> {
        self.inner.test_connection().await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        self.inner.exists_by_email(email).await
    }

    async fn exists_by_email_and_id_not(&self, email: &str, id: &PatientId) -> Result<bool> {
        self.inner.exists_by_email_and_id_not(email, id).await
    }

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, patient: &Patient) -> Result<Patient> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PatientError::Storage(StorageError::WriteFailed(
                "disk full".to_string(),
            )));
        }
        self.inner.save(patient).await
    }

    async fn delete_by_id(&self, id: &PatientId) -> Result<()> {
        self.inner.delete_by_id(id).await
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Patient>> {
        self.page_queries.fetch_add(1, Ordering::SeqCst);
        let page = self.inner.find_page(request).await;

        let pause = self.page_pause.lock().unwrap().take();
        if let Some((read_done, release)) = pause {
            let _ = read_done.send(());
            let _ = release.await;
        }
        page
    }

    async fn find_page_by_name_containing(
        &self,
        term: &str,
        request: &PageRequest,
    ) -> Result<Page<Patient>> {
        self.search_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_page_by_name_containing(term, request).await
    }

    async fn find_pending_side_effects(
        &self,
        created_before: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Patient>> {
        self.inner.find_pending_side_effects(created_before, limit).await
    }

    async fn mark_provisioned(&self, id: &PatientId, account: &BillingAccount) -> Result<bool> {
        if self.delete_on_provision.load(Ordering::SeqCst) {
            self.inner.delete_by_id(id).await?;
        }
        self.inner.mark_provisioned(id, account).await
    }

    async fn mark_event_published(&self, id: &PatientId) -> Result<bool> {
        self.inner.mark_event_published(id).await
    }
}

/// Result cache that counts reads and writes
pub struct CountingCache {
    pub inner: InMemoryResultCache,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub invalidations: AtomicUsize,
    /// Every operation fails as if the backend were unreachable
    pub fail: AtomicBool,
}

impl Default for CountingCache {
    fn default() -> Self {
        Self {
            inner: InMemoryResultCache::new(None, 100),
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
            invalidations: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }
}

impl CountingCache {
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PatientError::Cache("cache unreachable".to_string()));
        }
        Ok(())
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultCache for CountingCache {
    fn backend_name(&self) -> &'static str {
        "counting"
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<PagedPatients>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get(key).await
    }

    async fn generation(&self) -> Result<u64> {
        self.check()?;
        self.inner.generation().await
    }

    async fn put(&self, key: CacheKey, generation: u64, value: PagedPatients) -> Result<bool> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.put(key, generation, value).await
    }

    async fn invalidate_all(&self) -> Result<()> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.invalidate_all().await
    }
}

/// Orchestrator wired to recording doubles
pub struct Harness {
    pub store: Arc<CountingStore>,
    pub billing: Arc<RecordingBilling>,
    pub events: Arc<RecordingEmitter>,
    pub cache: Arc<CountingCache>,
    pub orchestrator: PatientOrchestrator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(OrchestratorSettings::default())
    }

    pub fn with_settings(settings: OrchestratorSettings) -> Self {
        let store = Arc::new(CountingStore::default());
        let billing = Arc::new(RecordingBilling::default());
        let events = Arc::new(RecordingEmitter::default());
        let cache = Arc::new(CountingCache::default());

        let orchestrator = PatientOrchestrator::new(
            store.clone(),
            driver(&store, &billing, &events),
            Some(cache.clone() as Arc<dyn ResultCache + Send + Sync>),
            settings,
        );

        Self {
            store,
            billing,
            events,
            cache,
            orchestrator,
        }
    }

    /// Relay sharing this harness's doubles, picking up patients of any age
    pub fn relay(&self) -> SideEffectRelay {
        self.relay_with_min_age(0)
    }

    pub fn relay_with_min_age(&self, min_age_seconds: u64) -> SideEffectRelay {
        SideEffectRelay::new(
            self.store.clone(),
            driver(&self.store, &self.billing, &self.events),
            RelayConfig {
                enabled: true,
                interval_seconds: 1,
                batch_size: 100,
                min_age_seconds,
            },
        )
    }
}

fn driver(
    store: &Arc<CountingStore>,
    billing: &Arc<RecordingBilling>,
    events: &Arc<RecordingEmitter>,
) -> SideEffectDriver {
    SideEffectDriver::new(
        store.clone(),
        billing.clone(),
        events.clone(),
        fast_retry(),
        fast_retry(),
    )
}

/// Three attempts with millisecond backoff
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
        backoff_multiplier: 2.0,
        attempt_timeout: Duration::from_millis(500),
    }
}

pub fn request(name: &str, email: &str) -> PatientRequest {
    PatientRequest::new(
        name,
        email,
        "1 Main St",
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
    )
}

/// Request with generated name and address and an email unique to `index`
pub fn fake_request(index: usize) -> PatientRequest {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    let address: String = StreetName().fake();
    let days: i64 = (0..20_000).fake();

    PatientRequest::new(
        name,
        format!("{index}.{email}"),
        address,
        NaiveDate::from_ymd_opt(1940, 1, 1).unwrap() + chrono::Duration::days(days),
    )
}
