//! Fixed-spacing retry for async operations

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;

/// Linear retry: constant delay, bounded attempts, no jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// `retry_attempts` attempts spaced by `min_delay`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.retry_attempts, config.min_delay())
    }

    /// Run `op` until it succeeds or attempts are exhausted
    ///
    /// Every failure that will be retried logs a warning and waits `delay`.
    /// The last failure is returned unchanged, without a trailing sleep.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempt >= max_attempts => {
                    debug!(operation, attempt, error = %e, "Retry attempts exhausted");
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Attempt {}/{} failed: {}",
                        attempt,
                        max_attempts,
                        e
                    );
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}
