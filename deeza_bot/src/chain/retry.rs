use std::future::Future;
use std::time::Duration;

use deeza_core::helpers::error::ChainError;
use tokio::time::sleep;

pub const DEFAULT_ATTEMPTS: u32 = 3;
/// Release moves funds, so it gets one extra attempt.
pub const RELEASE_ATTEMPTS: u32 = 4;
pub const RETRY_DELAY: Duration = Duration::from_millis(3000);

/// Run `operation` up to `max_attempts` times with a fixed delay between
/// attempts. Authoritative rejections (already claimed, locked, unauthorized)
/// short-circuit immediately; only transport errors are retried. On
/// exhaustion the last error is propagated to the caller.
pub async fn with_retry<T, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    delay: Duration,
) -> Result<T, ChainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ChainError>>,
{
    let mut last_error = None;
    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                log::warn!("attempt {}/{} failed: {}", attempt, max_attempts, error);
                if !error.is_retryable() {
                    return Err(error);
                }
                last_error = Some(error);
                if attempt < max_attempts {
                    sleep(delay).await;
                }
            }
        }
    }
    Err(last_error.expect("at least one attempt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ChainError>(7u32) }
            },
            3,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_last_error_without_extra_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(ChainError::Network(format!("boom {}", n))) }
            },
            3,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Err(ChainError::Network("boom 3".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(ChainError::Network("flaky".to_string()))
                    } else {
                        Ok(n)
                    }
                }
            },
            3,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_authoritative_rejection_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ChainError::AlreadyClaimed) }
            },
            4,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Err(ChainError::AlreadyClaimed));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
