use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub name: String,
    pub url: String,
    /// URL path of the uploaded icon, e.g. `/uploads/1700000000-ab12cd34-logo.png`
    pub icon: Option<String>,
    pub category: Option<String>,
    pub colour: Option<String>,
    pub hit_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Input of `LinkStore::create_link`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLink {
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub category: Option<String>,
    pub colour: Option<String>,
}

impl NewLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = Some(colour.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}
