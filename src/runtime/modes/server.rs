//! Server mode
//!
//! Builds the HTTP server, serves until the listener fails or a termination
//! signal arrives, then drains within the configured grace period.

use std::time::Duration;

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::api::middleware::{AccessLog, Recovery};
use crate::api::services::{AppStartTime, app_routes};
use crate::config::StaticConfig;
use crate::runtime::LifecycleState;
use crate::runtime::lifetime::{
    shutdown::{graceful_stop, release_storage},
    startup::{StartupContext, prepare_server_startup},
};
use crate::system::wait_for_termination;

const KEEP_ALIVE: Duration = Duration::from_secs(60);
const CLIENT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Run the HTTP server until shutdown.
///
/// **Note**: Logging must be initialized before calling this function.
pub async fn run_server(config: StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime::now();
    LifecycleState::Starting.enter();

    let startup = prepare_server_startup(&config).await.map_err(|e| {
        error!("Server startup failed: {:#}", e);
        LifecycleState::Stopped.enter();
        e
    })?;

    let storage = startup.storage.clone();
    let result = serve(&config, startup, app_start_time).await;

    release_storage(&storage).await;
    LifecycleState::Stopped.enter();
    result
}

async fn serve(config: &StaticConfig, startup: StartupContext, start: AppStartTime) -> Result<()> {
    let dashboard = web::Data::new(startup.dashboard);
    let settings = web::Data::new(startup.settings);
    let start = web::Data::new(start);
    let grace = Duration::from_secs(config.server.shutdown_grace_secs);
    let bind_address = config.bind_address();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Recovery)
            .wrap(AccessLog) // 最外层，panic 恢复后的 500 也会被记录
            .app_data(dashboard.clone())
            .app_data(settings.clone())
            .app_data(start.clone())
            .configure(app_routes)
    })
    .keep_alive(KEEP_ALIVE)
    .client_request_timeout(CLIENT_REQUEST_TIMEOUT)
    .shutdown_timeout(config.server.shutdown_grace_secs)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    LifecycleState::Serving.enter();
    warn!("Starting server at http://{}", bind_address);

    let handle = server.handle();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => {
            res.context("HTTP server failed")?;
            warn!("HTTP server exited without a shutdown signal");
            return Ok(());
        }
        _ = wait_for_termination() => {
            info!("Termination signal received");
        }
    }

    LifecycleState::ShuttingDown.enter();
    graceful_stop(handle, server, grace).await?;
    Ok(())
}
