//! Retry with exponential backoff for Cursor API operations.
//!
//! The client itself never retries; callers opt in by wrapping a call in
//! [`with_retry`] with a [`RetryPolicy`] describing how many attempts to
//! make, how long to wait between them and which error kinds qualify.

use std::time::Duration;

use log::{debug, warn};

use crate::errors::{CursorError, ErrorKind};

/// Default number of additional attempts after the first.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Controls how failed operations are retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first; `max_retries = 3` allows up
    /// to four invocations in total. Zero disables retries entirely.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay, including `Retry-After` hints.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub exponential_base: f64,
    /// Error kinds that qualify for a retry.
    pub retry_on: Vec<ErrorKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            exponential_base: 2.0,
            retry_on: vec![ErrorKind::Network, ErrorKind::RateLimit],
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_exponential_base(mut self, exponential_base: f64) -> Self {
        self.exponential_base = exponential_base;
        self
    }

    pub fn with_retry_on(mut self, kinds: &[ErrorKind]) -> Self {
        self.retry_on = kinds.to_vec();
        self
    }

    /// Whether an error of this kind qualifies for a retry.
    pub fn is_retryable(&self, kind: ErrorKind) -> bool {
        self.retry_on.contains(&kind)
    }

    /// Exponential backoff delay for a 0-based attempt index: the first
    /// retry waits `initial_delay`, each later one multiplies that by
    /// `exponential_base`, capped at `max_delay`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = self.exponential_base.powi(attempt as i32);
        self.clamp_seconds(self.initial_delay.as_secs_f64() * factor)
    }

    /// Delay before the next attempt. A parsable `Retry-After` on a rate
    /// limit error overrides the exponential schedule for this wait; a
    /// zero or negative hint means retry immediately, not "no hint".
    pub fn delay_for(&self, error: &CursorError, attempt: u32) -> Duration {
        if let CursorError::RateLimit(api) = error {
            if let Some(seconds) = api.retry_after_seconds() {
                return self.clamp_seconds(seconds);
            }
        }
        self.backoff_delay(attempt)
    }

    // The max/min order also maps NaN to zero, keeping from_secs_f64
    // panic-free.
    fn clamp_seconds(&self, seconds: f64) -> Duration {
        Duration::from_secs_f64(seconds.max(0.0).min(self.max_delay.as_secs_f64()))
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error,
/// or the policy's attempts are exhausted. The final error is returned
/// unchanged, never wrapped. `operation_name` only appears in log lines.
#[tracing::instrument(skip(policy, operation))]
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, CursorError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, CursorError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !policy.is_retryable(e.kind()) {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }

                if attempt >= policy.max_retries {
                    return Err(e);
                }

                let delay = policy.delay_for(&e, attempt);
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {:?}...",
                    operation_name,
                    attempt + 1,
                    policy.max_retries + 1,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
