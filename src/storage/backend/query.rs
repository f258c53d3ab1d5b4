//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{
    Condition, EntityTrait, ExprTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, Func, LikeExpr},
};
use tracing::debug;

use super::converters::model_to_link;
use super::{SeaOrmStorage, retry};
use crate::errors::{LinkboardError, Result};
use crate::storage::Link;

use migration::entities::link;

/// Unicode case-insensitive substring match over name, url and category.
pub(crate) fn matches_folded(link: &Link, needle: &str) -> bool {
    let hit = |value: &str| value.to_lowercase().contains(needle);
    hit(&link.name) || hit(&link.url) || link.category.as_deref().is_some_and(hit)
}

/// Escape LIKE wildcards so the term is matched literally. Case is left alone.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

impl SeaOrmStorage {
    pub async fn list(&self) -> Result<Vec<Link>> {
        let db = &self.db;

        let models = retry::with_retry("list_links", self.retry_config, || async {
            link::Entity::find()
                .order_by_asc(link::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| LinkboardError::database_operation(format!("Failed to list links: {}", e)))?;

        debug!("Loaded {} links", models.len());
        Ok(models.into_iter().map(model_to_link).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Link> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_link({})", id), self.retry_config, || async {
            link::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| {
            LinkboardError::database_operation(format!("Failed to load link {}: {}", id, e))
        })?;

        model
            .map(model_to_link)
            .ok_or_else(|| LinkboardError::not_found(format!("Link not found: {}", id)))
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Link>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list().await;
        }

        // SQLite 的 LOWER() 只折叠 ASCII，非 ASCII 关键词在内存中比较
        if !term.is_ascii() {
            let needle = term.to_lowercase();
            let links: Vec<Link> = self
                .list()
                .await?
                .into_iter()
                .filter(|link| matches_folded(link, &needle))
                .collect();
            debug!("Search '{}' matched {} links", term, links.len());
            return Ok(links);
        }

        // ASCII 小写与 SQL LOWER() 一致，即 LOWER(col) LIKE LOWER(%term%)
        let pattern = like_pattern(&term.to_ascii_lowercase());
        let lower_like = |col: link::Column| {
            Func::lower(Expr::col(col)).like(LikeExpr::new(pattern.as_str()).escape('\\'))
        };
        let condition = Condition::any()
            .add(lower_like(link::Column::Name))
            .add(lower_like(link::Column::Url))
            .add(lower_like(link::Column::Category));

        let db = &self.db;
        let models = retry::with_retry("search_links", self.retry_config, || async {
            link::Entity::find()
                .filter(condition.clone())
                .order_by_asc(link::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| {
            LinkboardError::database_operation(format!("Failed to search links: {}", e))
        })?;

        debug!("Search '{}' matched {} links", term, models.len());
        Ok(models.into_iter().map(model_to_link).collect())
    }
}
