//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use sea_orm::{ColumnTrait, EntityTrait, ExprTrait, QueryFilter, sea_query::Expr};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::new_link_to_active_model;
use super::retry;
use crate::errors::{LinkboardError, Result};
use crate::storage::NewLink;

use migration::entities::link;

impl SeaOrmStorage {
    pub async fn create(&self, new_link: NewLink) -> Result<i64> {
        if new_link.name.trim().is_empty() {
            return Err(LinkboardError::validation("name is required"));
        }
        if new_link.url.trim().is_empty() {
            return Err(LinkboardError::validation("url is required"));
        }

        let db = &self.db;
        let name = new_link.name.clone();

        let result = retry::with_write_retry("create_link", self.retry_config, || {
            let active_model = new_link_to_active_model(new_link.clone());
            async move { link::Entity::insert(active_model).exec(db).await }
        })
        .await
        .map_err(|e| {
            LinkboardError::database_operation(format!("Failed to create link: {}", e))
        })?;

        info!("Link created: {} (id {})", name, result.last_insert_id);
        Ok(result.last_insert_id)
    }

    /// 单条 UPDATE 完成自增，并发点击不会丢失计数
    pub async fn increment_hit(&self, id: i64) -> Result<()> {
        let db = &self.db;

        let result = retry::with_write_retry(&format!("record_hit({})", id), self.retry_config, || async {
            link::Entity::update_many()
                .col_expr(
                    link::Column::HitCount,
                    Expr::col(link::Column::HitCount).add(1),
                )
                .filter(link::Column::Id.eq(id))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| {
            LinkboardError::database_operation(format!("Failed to record hit for {}: {}", id, e))
        })?;

        if result.rows_affected == 0 {
            return Err(LinkboardError::not_found(format!("Link not found: {}", id)));
        }
        Ok(())
    }
}
