pub mod access_log;
pub mod cache_control;
pub mod recovery;

pub use access_log::AccessLog;
pub use cache_control::{CacheControl, STATIC_ASSET_CACHE_CONTROL};
pub use recovery::Recovery;
