//! Retry policy with exponential backoff
//!
//! Backoff doubles with each retry: base → 2·base → 4·base ...
//! Whether an error is worth another attempt is decided by a caller-supplied
//! predicate, so the same policy serves any fallible async operation.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy configuration for handling transient errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, the first one included
    max_attempts: u32,
    /// Delay before the first retry
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// # Arguments
    /// * `max_attempts` - Total attempts (recommended: 3); values below 1 are raised to 1
    /// * `base_delay` - Delay before the first retry (recommended: 1s)
    ///
    /// # Example
    /// ```
    /// use ragchat::infrastructure::retry::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(3, Duration::from_secs(1));
    /// assert_eq!(policy.max_attempts(), 3);
    /// ```
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Execute an operation, retrying while `should_retry` accepts the error
    ///
    /// # Returns
    /// * `Ok((T, attempts))` - Operation succeeded on attempt number `attempts`
    /// * `Err((E, attempts))` - The last error and how many attempts were made
    pub async fn execute<F, Fut, T, E, P>(
        &self,
        mut operation: F,
        should_retry: P,
    ) -> Result<(T, u32), (E, u32)>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!("Operation succeeded after {} retries", attempt);
                    }
                    return Ok((result, attempt + 1));
                }
                Err(err) => {
                    let retryable = should_retry(&err);
                    if retryable && attempt + 1 < self.max_attempts {
                        let backoff = self.backoff_for(attempt);
                        warn!(
                            "Attempt {}/{} failed with transient error: {}. Retrying in {:?}...",
                            attempt + 1,
                            self.max_attempts,
                            err,
                            backoff
                        );

                        sleep(backoff).await;
                        attempt += 1;
                    } else {
                        if retryable {
                            warn!("Operation failed after {} attempts: {}", attempt + 1, err);
                        } else {
                            debug!("Permanent error, not retrying: {}", err);
                        }
                        return Err((err, attempt + 1));
                    }
                }
            }
        }
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    /// Three attempts, waiting 1s then 2s between them
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
