//! Retry for transient `SQLite` lock contention.
//!
//! A second process (for example `osseo audit record` while `osseo serve`
//! holds a write) makes statements fail with "database is locked". Those
//! clear on their own within milliseconds, so single statements issued
//! through [`ClinicDb::execute_with`](crate::ClinicDb::execute_with) and
//! [`ClinicDb::query_with`](crate::ClinicDb::query_with) are retried with
//! exponential backoff. Transactions are not retried.

use std::future::Future;
use std::time::Duration;

/// Configuration for retry behavior on transient lock errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
        }
    }
}

/// Detect transient lock contention.
///
/// Only lock contention qualifies. SQL and constraint errors are returned
/// on the first attempt.
pub fn is_transient_lock_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked") || msg.contains("database table is locked")
}

/// Run `op` until it succeeds, fails with a non-transient error, or runs out of attempts.
pub(crate) async fn with_retry<T, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, libsql::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, libsql::Error>>,
{
    let mut attempt = 1;
    let mut delay = config.base_delay;
    loop {
        match op().await {
            Err(e) if attempt < config.max_attempts && is_transient_lock_error(&e) => {
                tracing::debug!(attempt, error = %e, "transient lock error; retrying");
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(config.max_delay);
                attempt += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn locked() -> libsql::Error {
        libsql::Error::SqliteFailure(5, "database is locked".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryConfig::default(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(locked())
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&RetryConfig::default(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(locked())
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn does_not_retry_other_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&RetryConfig::default(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(libsql::Error::SqliteFailure(19, "UNIQUE constraint failed".to_string()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
