use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{Link, NewLink};

/// Data-access contract used by every handler.
///
/// Handlers only ever see `Arc<dyn LinkStore>`, so the concrete engine can be
/// swapped without touching them. Dropping a returned future cancels the
/// operation.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// All links in insertion order. Presentation order is the aggregator's job.
    async fn list_links(&self) -> Result<Vec<Link>>;

    /// Insert a link and return its id. Name and url must be non-empty.
    async fn create_link(&self, link: NewLink) -> Result<i64>;

    /// Atomically increment the hit count of `id`.
    async fn record_hit(&self, id: i64) -> Result<()>;

    async fn get_link(&self, id: i64) -> Result<Link>;

    /// Case-insensitive substring match over name, url and category.
    /// A blank term returns every link.
    async fn search_links(&self, term: &str) -> Result<Vec<Link>>;

    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;

        let storage =
            SeaOrmStorage::connect(&config.database_url, &backend_type, config.pool_size).await?;
        Ok(Arc::new(storage))
    }
}
