//! 数据库操作重试
//!
//! Reads retry on lock contention and connection failures. Writes are not
//! idempotent (`INSERT`, `hit_count + 1`): a connection that drops after the
//! statement was sent may already have committed it, so writes only retry on
//! lock contention or when no connection could be acquired at all.

use sea_orm::DbErr;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// 判断数据库错误是否可重试
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_retryable_message(&runtime_err.to_string().to_lowercase())
        }
        _ => false,
    }
}

/// SQLite BUSY/LOCKED, MySQL deadlock, PostgreSQL serialization failure
fn is_retryable_message(err_str: &str) -> bool {
    err_str.contains("database is locked")
        || err_str.contains("database table is locked")
        || err_str.contains("deadlock")
        || err_str.contains("lock wait timeout")
        || err_str.contains("serialization failure")
}

#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 50,
            max_delay_ms: 1000,
        }
    }
}

/// 写操作是否可重试：语句确定没有执行过
pub fn is_retryable_write_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_retryable_message(&runtime_err.to_string().to_lowercase())
        }
        _ => false,
    }
}

/// 指数退避重试执行器（只读操作）
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    retry_while(operation_name, config, is_retryable_error, operation).await
}

/// Retry executor for non-idempotent writes.
pub async fn with_write_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    retry_while(operation_name, config, is_retryable_write_error, operation).await
}

async fn retry_while<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    retryable: fn(&DbErr) -> bool,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "Operation '{}' succeeded after {} retries",
                        operation_name, attempt
                    );
                }
                return Ok(result);
            }
            Err(e) if retryable(&e) && attempt < config.max_retries => {
                attempt += 1;
                let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "Operation '{}' failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 计算指数退避延迟（带 0-25% 抖动）
fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    use rand::RngExt;
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp_delay.min(max_ms);
    let jitter = rand::rng().random_range(0..=capped / 4);
    capped.saturating_add(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn backoff_is_capped() {
        for attempt in 1..10 {
            let delay = calculate_backoff(attempt, 50, 1000);
            assert!(delay <= 1250, "attempt {} gave {}", attempt, delay);
        }
    }

    #[test]
    fn reads_retry_contention_and_connection_errors() {
        assert!(is_retryable_error(&DbErr::Conn(
            sea_orm::RuntimeErr::Internal("broken pipe".into())
        )));
        assert!(!is_retryable_error(&DbErr::RecordNotFound("links".into())));
        assert!(!is_retryable_error(&DbErr::Custom("database is locked".into())));
    }

    #[test]
    fn writes_do_not_retry_dropped_connections() {
        let dropped = DbErr::Conn(sea_orm::RuntimeErr::Internal("broken pipe".into()));
        assert!(is_retryable_error(&dropped));
        assert!(!is_retryable_write_error(&dropped));

        let locked = DbErr::Exec(sea_orm::RuntimeErr::Internal("database is locked".into()));
        assert!(is_retryable_write_error(&locked));
        assert!(is_retryable_write_error(&DbErr::ConnectionAcquire(
            sea_orm::ConnAcquireErr::Timeout
        )));
    }

    #[tokio::test]
    async fn write_retry_stops_on_dropped_connection() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig {
            max_retries: 3,
            base_delay_ms: 1,
            max_delay_ms: 2,
        };
        let result: Result<(), DbErr> = with_write_retry("insert", config, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(DbErr::Conn(sea_orm::RuntimeErr::Internal(
                    "connection reset".into(),
                )))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_retryable_errors_fail_fast() {
        let calls = AtomicU32::new(0);
        let result: Result<(), DbErr> = with_retry("test", RetryConfig::default(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbErr::Custom("boom".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retryable_errors_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig {
            max_retries: 3,
            base_delay_ms: 1,
            max_delay_ms: 2,
        };
        let result = with_retry("test", config, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DbErr::Conn(sea_orm::RuntimeErr::Internal(
                        "database is locked".into(),
                    )))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
