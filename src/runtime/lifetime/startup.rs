use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::services::DashboardSettings;
use crate::config::StaticConfig;
use crate::runtime::LifecycleState;
use crate::services::DashboardService;
use crate::storage::{LinkStore, SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub dashboard: DashboardService,
    pub settings: DashboardSettings,
}

/// 准备服务器启动的上下文：打开存储、执行迁移、准备上传目录
///
/// On error every resource opened here has already been released.
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to open the link store")?;
    info!("Using storage backend: {}", storage.backend_name());

    if let Err(e) = finish_startup(config, &storage).await {
        storage.close().await;
        return Err(e);
    }

    let store: Arc<dyn LinkStore> = storage.clone();
    let context = StartupContext {
        dashboard: DashboardService::new(store),
        settings: DashboardSettings::from_config(config),
        storage,
    };

    debug!("Startup completed in {:?}", start_time.elapsed());
    Ok(context)
}

async fn finish_startup(config: &StaticConfig, storage: &SeaOrmStorage) -> Result<()> {
    LifecycleState::Migrating.enter();
    storage.migrate().await.context("Database migration failed")?;

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.uploads.dir.display()
            )
        })?;
    debug!("Upload directory ready: {}", config.uploads.dir.display());
    Ok(())
}
