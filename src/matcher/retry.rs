//! Bounded retry executor for the match operation
//!
//! Retries a fallible async operation up to a fixed number of attempts with
//! a linear backoff between attempts: retry `i` (1-indexed, i >= 2) waits
//! `backoff_base * (i - 1)`, so the defaults give 100ms then 200ms. No delay
//! is applied after the final attempt. The executor treats failures as
//! opaque - it only distinguishes success from failure, never the cause.

use crate::error::{SuggestError, SuggestResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Executes an operation with bounded retry and linear backoff
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryExecutor {
    /// Create an executor with the given attempt limit and base delay
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        // An executor that never attempts is useless; clamp to one attempt
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// Maximum number of attempts this executor will make
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run the operation, retrying transient failures with backoff
    ///
    /// Returns the first successful result. When every attempt fails, maps
    /// the terminal failure to `OperationExhausted` carrying the attempt
    /// count. The backoff waits on `tokio::time::sleep`, so a delayed retry
    /// suspends cooperatively instead of occupying a worker thread.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> SuggestResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SuggestResult<T>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                attempt,
                max_attempts = self.max_attempts,
                "Executing match operation"
            );

            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    let delay = self.backoff_base * attempt;
                    warn!(
                        error = %e,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Match attempt failed, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        attempts = attempt,
                        "Match operation failed on final attempt"
                    );
                    return Err(SuggestError::exhausted(attempt));
                }
            }
        }
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}
