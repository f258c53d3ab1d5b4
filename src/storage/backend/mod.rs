//! SeaORM storage backend
//!
//! SQLite is the primary engine; MySQL/MariaDB and PostgreSQL URLs are
//! accepted as well since the schema is portable.

mod connection;
mod converters;
mod link_store;
mod mutations;
mod query;
pub mod retry;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::errors::{LinkboardError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_link, new_link_to_active_model};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url.ends_with(".sqlite3")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LinkboardError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported schemes: sqlite:, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        "postgresql" => "postgres".to_string(),
        other => other.to_string(),
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    /// Open a pool and verify it with a ping. Migrations are run separately
    /// so the caller can log the `Migrating` phase.
    pub async fn connect(database_url: &str, backend_name: &str, pool_size: u32) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinkboardError::database_config("database_url is empty"));
        }

        let backend_name = normalize_backend_name(backend_name);
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, pool_size).await?
        } else {
            connect_generic(database_url, &backend_name, pool_size).await?
        };

        db.ping().await.map_err(|e| {
            LinkboardError::database_connection(format!("Database ping failed: {}", e))
        })?;

        info!("{} storage connected", backend_name.to_uppercase());
        Ok(SeaOrmStorage {
            db,
            backend_name,
            retry_config: retry::RetryConfig::default(),
        })
    }

    /// Apply all pending migrations. Safe to call on an up-to-date schema.
    pub async fn migrate(&self) -> Result<()> {
        run_migrations(&self.db).await
    }

    /// Close the pool. Errors are logged, not returned: by the time this runs
    /// the process is on its way out.
    pub async fn close(&self) {
        if let Err(e) = self.db.close_by_ref().await {
            warn!("Failed to close database pool cleanly: {}", e);
        } else {
            info!("Database connection closed");
        }
    }
}
