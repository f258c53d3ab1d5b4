use async_trait::async_trait;

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::{Link, LinkStore, NewLink};

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn list_links(&self) -> Result<Vec<Link>> {
        self.list().await
    }

    async fn create_link(&self, link: NewLink) -> Result<i64> {
        self.create(link).await
    }

    async fn record_hit(&self, id: i64) -> Result<()> {
        self.increment_hit(id).await
    }

    async fn get_link(&self, id: i64) -> Result<Link> {
        self.get(id).await
    }

    async fn search_links(&self, term: &str) -> Result<Vec<Link>> {
        self.search(term).await
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
