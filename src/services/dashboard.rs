//! Dashboard service
//!
//! Glue between the store and the aggregator, shared by every HTTP handler.

use std::sync::Arc;

use tracing::{error, warn};

use super::aggregator::{CategoryGroup, group_links};
use crate::errors::{LinkboardError, Result};
use crate::storage::{Link, LinkStore, NewLink};

/// Result of a best-effort click record. Never turned into an error by the
/// caller; `Failed` only changes the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Recorded,
    /// Unparseable or unknown id.
    Ignored,
    Failed,
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn LinkStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    pub async fn groups(&self) -> Result<Vec<CategoryGroup>> {
        let links = self.store.list_links().await?;
        Ok(group_links(links))
    }

    pub async fn search_groups(&self, term: &str) -> Result<Vec<CategoryGroup>> {
        let links = self.store.search_links(term).await?;
        Ok(group_links(links))
    }

    pub async fn create_link(&self, new_link: NewLink) -> Result<i64> {
        self.store.create_link(normalize_new_link(new_link)?).await
    }

    pub async fn get_link(&self, id: i64) -> Result<Link> {
        self.store.get_link(id).await
    }

    /// `raw_id` is the untouched form value.
    pub async fn record_click(&self, raw_id: Option<&str>) -> ClickOutcome {
        let Some(id) = raw_id.and_then(|s| s.trim().parse::<i64>().ok()) else {
            warn!("Invalid link id received: {:?}", raw_id);
            return ClickOutcome::Ignored;
        };

        match self.store.record_hit(id).await {
            Ok(()) => ClickOutcome::Recorded,
            Err(LinkboardError::NotFound(msg)) => {
                warn!("Click on unknown link ignored: {}", msg);
                ClickOutcome::Ignored
            }
            Err(e) => {
                error!("Failed to record link hit for {}: {}", id, e);
                ClickOutcome::Failed
            }
        }
    }
}

/// Trim required fields and turn blank optionals into `None`. Idempotent.
pub fn normalize_new_link(new_link: NewLink) -> Result<NewLink> {
    let name = new_link.name.trim().to_string();
    let url = new_link.url.trim().to_string();
    if name.is_empty() || url.is_empty() {
        return Err(LinkboardError::validation("Name and URL are required"));
    }

    let non_blank = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    Ok(NewLink {
        name,
        url,
        icon: non_blank(new_link.icon),
        category: non_blank(new_link.category),
        colour: non_blank(new_link.colour),
    })
}
