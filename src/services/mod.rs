//! Service layer
//!
//! Business logic shared by the HTTP handlers.

pub mod aggregator;
mod dashboard;

pub use aggregator::{CategoryGroup, OTHER_CATEGORY, effective_category, group_links};
pub use dashboard::{ClickOutcome, DashboardService, normalize_new_link};
