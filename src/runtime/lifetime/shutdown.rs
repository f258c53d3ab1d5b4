use std::future::Future;
use std::time::{Duration, Instant};

use actix_web::dev::ServerHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::errors::{LinkboardError, Result};
use crate::storage::SeaOrmStorage;

/// Extra time on top of the grace period before giving up on the server
/// future entirely.
const STOP_SLACK: Duration = Duration::from_secs(1);

/// Stop accepting, drain in-flight requests, and wait for the server to exit.
///
/// actix force-closes workers once `grace` elapses; that case is reported as
/// a `Shutdown` error.
pub async fn graceful_stop<F>(handle: ServerHandle, server: F, grace: Duration) -> Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    let started = Instant::now();
    info!("Draining in-flight requests (grace period {:?})", grace);

    let stopped = timeout(grace + STOP_SLACK, async {
        let ((), result) = tokio::join!(handle.stop(true), server);
        result
    })
    .await;

    let elapsed = started.elapsed();
    match stopped {
        Ok(Ok(())) if !grace.is_zero() && elapsed >= grace => {
            warn!("Grace period exceeded, remaining connections were closed");
            Err(LinkboardError::shutdown(format!(
                "in-flight requests did not finish within {:?}",
                grace
            )))
        }
        Ok(Ok(())) => {
            info!("Server drained in {:?}", elapsed);
            Ok(())
        }
        Ok(Err(e)) => {
            error!("Server reported an error while stopping: {}", e);
            Err(LinkboardError::shutdown(format!(
                "server error during shutdown: {}",
                e
            )))
        }
        Err(_) => {
            error!("Server did not stop within {:?}", grace + STOP_SLACK);
            Err(LinkboardError::shutdown(format!(
                "server did not stop within {:?}",
                grace + STOP_SLACK
            )))
        }
    }
}

/// 释放数据库连接
pub async fn release_storage(storage: &SeaOrmStorage) {
    storage.close().await;
}
