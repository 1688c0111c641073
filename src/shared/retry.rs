//! Retry with exponential backoff
//!
//! Generic retry helper for transient failures (timeouts, connection
//! resets). Used for idempotent reads against the reservation service;
//! create calls go through the idempotency-key path instead and are
//! never retried here.

use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries (cap).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// At most one retry: the policy for idempotent reads.
    pub fn single_retry() -> Self {
        Self {
            max_attempts: 2,
            ..Self::default()
        }
    }
}

/// Execute an async operation with exponential backoff retry.
///
/// The `should_retry` closure decides whether a given error is
/// transient (retryable) or permanent (bail immediately).
///
/// # Example
/// ```ignore
/// let reservations = retry_with_backoff(
///     RetryConfig::single_retry(),
///     || api.list_for_user(user_id),
///     DomainError::is_transient,
///     "list_reservations",
/// ).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: RetryConfig,
    mut operation: F,
    should_retry: impl Fn(&E) -> bool,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = config.initial_delay;

    for attempt in 1..=config.max_attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation = operation_name, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if attempt == config.max_attempts || !should_retry(&err) {
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = config.max_attempts,
                        error = %err,
                        "Operation failed permanently"
                    );
                    return Err(err);
                }

                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %err,
                    retry_in_ms = delay.as_millis() as u64,
                    "Transient failure, retrying"
                );

                tokio::time::sleep(delay).await;

                // Exponential backoff with cap
                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.backoff_multiplier)
                        .min(config.max_delay.as_secs_f64()),
                );
            }
        }
    }

    unreachable!("Loop exits via return")
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn succeeds_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<u32, String> = retry_with_backoff(
            quick_config(3),
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42)
            },
            |_| true,
            "test_op",
        )
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<u32, String> = retry_with_backoff(
            quick_config(3),
            || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err("flaky".to_string())
                } else {
                    Ok(7)
                }
            },
            |_| true,
            "test_op",
        )
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_error_bails_immediately() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<u32, String> = retry_with_backoff(
            quick_config(3),
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("permanent".to_string())
            },
            |_| false,
            "test_op",
        )
        .await;
        assert_eq!(result, Err("permanent".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn single_retry_makes_at_most_two_attempts() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let mut config = RetryConfig::single_retry();
        config.initial_delay = Duration::from_millis(1);
        let result: Result<u32, String> = retry_with_backoff(
            config,
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("timeout".to_string())
            },
            |_| true,
            "test_op",
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
