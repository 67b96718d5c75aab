//! Bounded retry with exponential backoff for remote calls
//!
//! Each attempt runs under its own timeout. Only errors that report themselves
//! as retryable are retried; anything else is returned immediately.

use crate::config::RetryConfig;
use crate::domain::{EmissionError, ProvisioningError};
use crate::log_retry_attempt;
use std::future::Future;
use std::time::Duration;

/// Errors that can drive a retry decision
pub trait Retryable: std::error::Error {
    /// True if another attempt may succeed
    fn is_retryable(&self) -> bool;

    /// Error to report when an attempt exceeds its timeout
    fn timed_out(after: Duration) -> Self;
}

impl Retryable for ProvisioningError {
    fn is_retryable(&self) -> bool {
        ProvisioningError::is_retryable(self)
    }

    fn timed_out(after: Duration) -> Self {
        ProvisioningError::Timeout(after.as_millis() as u64)
    }
}

impl Retryable for EmissionError {
    fn is_retryable(&self) -> bool {
        EmissionError::is_retryable(self)
    }

    fn timed_out(after: Duration) -> Self {
        EmissionError::Timeout(after.as_millis() as u64)
    }
}

/// Retry schedule for one kind of remote call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Upper bound on a single attempt
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    /// Builds a policy from a `[*.retry]` section and the section's timeout
    pub fn from_config(config: &RetryConfig, attempt_timeout: Duration) -> Self {
        Self {
            max_attempts: config.max_retries + 1,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
            attempt_timeout,
        }
    }

    /// A single attempt with no retries
    pub fn no_retry(attempt_timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            attempt_timeout,
        }
    }

    /// Delay before the attempt following `attempt` (1-based)
    pub fn delay_after(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Runs `operation` until it succeeds, fails permanently, or attempts run out
    pub async fn execute<T, E, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T, E>
    where
        E: Retryable,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let outcome = match tokio::time::timeout(self.attempt_timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(E::timed_out(self.attempt_timeout)),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() || attempt >= max_attempts => {
                    tracing::debug!(
                        operation = operation_name,
                        attempt,
                        retryable = e.is_retryable(),
                        "Giving up on operation"
                    );
                    return Err(e);
                }
                Err(e) => {
                    log_retry_attempt!(operation_name, attempt + 1, max_attempts, e);
                    tokio::time::sleep(self.delay_after(attempt)).await;
                }
            }
        }
    }
}
