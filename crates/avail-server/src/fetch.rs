//! Bounded retry-with-backoff for snapshot fetching.
//!
//! The engine itself performs no I/O; any upstream fetch happens before
//! engine invocation and is retried here with exponential backoff, capped
//! by a max-attempt count and surfaced as a single [`FetchError`].

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
#[error("fetch failed after {attempts} attempt(s): {message}")]
pub struct FetchError {
    pub attempts: u32,
    pub message: String,
}

/// Retry schedule: `base_delay * 2^n` between attempts, `max_attempts` total.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, FetchError>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut delay = policy.base_delay;

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt == attempts => {
                return Err(FetchError {
                    attempts,
                    message: err.to_string(),
                });
            }
            Err(err) => {
                warn!(attempt, %err, "fetch attempt failed, backing off");
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }

    unreachable!("loop returns on the final attempt");
}
