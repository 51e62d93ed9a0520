//! Retry with exponential back-off for the bulk-detail call.
//!
//! Only decode failures ([`RealtorError::Deserialize`]) are retried: the
//! provider intermittently answers large aliased queries with a truncated or
//! non-JSON body. Transport failures and HTTP status errors are returned
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::RealtorError;

/// Attempt budget and delay bounds for [`retry_decode_failures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that retries without sleeping.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based): `min_delay * 2^(retry-1)`,
    /// clamped to `[min_delay, max_delay]`.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(16);
        self.min_delay
            .saturating_mul(factor)
            .clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }
}

pub(crate) fn is_retriable(err: &RealtorError) -> bool {
    matches!(err, RealtorError::Deserialize { .. })
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// `policy.max_attempts` attempts have been made.
pub(crate) async fn retry_decode_failures<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, RealtorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RealtorError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "malformed bulk-detail response, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn deserialize_err() -> RealtorError {
        let src = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        RealtorError::Deserialize {
            context: "test".to_owned(),
            source: src,
        }
    }

    #[test]
    fn default_policy_matches_provider_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for(3), Duration::from_secs(10));
        assert_eq!(policy.delay_for(30), Duration::from_secs(10));
    }

    #[test]
    fn only_decode_errors_are_retriable() {
        assert!(is_retriable(&deserialize_err()));
        assert!(!is_retriable(&RealtorError::UnexpectedStatus {
            status: 502,
            url: "http://x".to_owned()
        }));
        assert!(!is_retriable(&RealtorError::InvalidRequest("x".to_owned())));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_decode_failures(RetryPolicy::immediate(3), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, RealtorError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_decode_failure_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_decode_failures(RetryPolicy::immediate(3), || {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(deserialize_err())
                } else {
                    Ok::<u32, RealtorError>(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_decode_failures(RetryPolicy::immediate(3), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(deserialize_err())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3, "3 attempts total");
        assert!(matches!(result, Err(RealtorError::Deserialize { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_status_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_decode_failures(RetryPolicy::immediate(3), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(RealtorError::UnexpectedStatus {
                    status: 500,
                    url: "http://provider".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(RealtorError::UnexpectedStatus { .. })));
    }
}
