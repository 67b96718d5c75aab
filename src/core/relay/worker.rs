//! Side-effect relay worker
//!
//! Picks up patients whose billing or event step never completed and drives
//! them through the same provision → emit sequence as creation.

use super::report::{RelayFailure, RelayReport};
use crate::adapters::store::{create_patient_store, PatientStore};
use crate::config::{PatientServiceConfig, RelayConfig};
use crate::core::patients::SideEffectDriver;
use crate::domain::{PatientError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Background worker completing pending side effects
pub struct SideEffectRelay {
    store: Arc<dyn PatientStore + Send + Sync>,
    driver: SideEffectDriver,
    config: RelayConfig,
}

impl SideEffectRelay {
    pub fn new(
        store: Arc<dyn PatientStore + Send + Sync>,
        driver: SideEffectDriver,
        config: RelayConfig,
    ) -> Self {
        Self {
            store,
            driver,
            config,
        }
    }

    /// Create a relay wired to the adapters named in the configuration
    pub async fn from_config(config: &PatientServiceConfig) -> Result<Self> {
        let store = create_patient_store(config).await?;
        let driver = SideEffectDriver::from_config(store.clone(), config)?;
        Ok(Self::new(store, driver, config.relay.clone()))
    }

    /// Run a single pass over pending patients
    ///
    /// # Errors
    ///
    /// Returns an error if `relay.min_age_seconds` is out of range or the
    /// pending patients cannot be loaded; per-patient failures are collected
    /// in the report.
    pub async fn run_once(&self) -> Result<RelayReport> {
        let start = Instant::now();
        let cutoff = self.cutoff(Utc::now())?;

        let pending = self
            .store
            .find_pending_side_effects(cutoff, self.config.batch_size)
            .await?;

        let mut report = RelayReport::new();
        report.examined = pending.len();

        for patient in pending {
            let id = patient.id;
            let outcome = self.driver.complete(patient).await;

            if outcome.removed {
                report.removed += 1;
            } else if outcome.is_complete() {
                report.completed += 1;
            } else {
                report.still_pending += 1;
                report.failures.extend(
                    outcome
                        .warnings
                        .iter()
                        .map(|w| RelayFailure::from_warning(id, w)),
                );
            }
        }

        let report = report.with_duration(start.elapsed());
        tracing::info!(
            examined = report.examined,
            completed = report.completed,
            still_pending = report.still_pending,
            removed = report.removed,
            duration_ms = report.duration.as_millis() as u64,
            "Relay pass finished"
        );

        Ok(report)
    }

    /// Newest creation time eligible for this pass
    fn cutoff(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        i64::try_from(self.config.min_age_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|age| now.checked_sub_signed(age))
            .ok_or_else(|| {
                PatientError::Configuration(format!(
                    "relay.min_age_seconds {} is out of range",
                    self.config.min_age_seconds
                ))
            })
    }

    /// Repeat passes every `relay.interval_seconds` until shutdown is signalled
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.interval_seconds));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            interval_seconds = self.config.interval_seconds,
            batch_size = self.config.batch_size,
            "Relay started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_once().await {
                        crate::log_error_with_context!(e, "Relay pass failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Relay stopped");
        Ok(())
    }
}
