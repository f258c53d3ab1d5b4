//! Termination signal handling

use std::future::Future;

use tracing::{info, warn};

/// Resolve once SIGINT or SIGTERM arrives (Ctrl+C on non-unix targets).
pub async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                None
            }
        };

        tokio::select! {
            _ = signal_or_pending("SIGINT", tokio::signal::ctrl_c()) => {
                info!("Received SIGINT");
            }
            _ = async {
                match sigterm.as_mut() {
                    Some(s) => { s.recv().await; }
                    None => std::future::pending::<()>().await,
                }
            } => {
                info!("Received SIGTERM");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal_or_pending("Ctrl+C", tokio::signal::ctrl_c()).await;
        info!("Received Ctrl+C");
    }
}

/// 监听失败时永远挂起，而不是当作收到了信号
async fn signal_or_pending<F>(name: &str, listener: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = listener.await {
        warn!("Failed to listen for {}: {}", name, e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::signal_or_pending;
    use std::time::Duration;

    #[tokio::test]
    async fn listener_error_never_resolves() {
        let failing = async { Err(std::io::Error::other("no signal driver")) };
        let resolved = tokio::time::timeout(
            Duration::from_millis(50),
            signal_or_pending("SIGINT", failing),
        )
        .await;
        assert!(resolved.is_err());
    }

    #[tokio::test]
    async fn delivered_signal_resolves() {
        let delivered = async { Ok(()) };
        let resolved = tokio::time::timeout(
            Duration::from_millis(50),
            signal_or_pending("SIGINT", delivered),
        )
        .await;
        assert!(resolved.is_ok());
    }
}
