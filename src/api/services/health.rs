use std::time::Instant;

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use crate::utils::format_duration;

/// Version reported by `/health`; independent of the crate version.
pub const HEALTH_VERSION: &str = "0.1";

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub started: Instant,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

/// Git metadata captured by `build.rs`; empty when built outside a checkout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildInfo {
    pub commit_hash: String,
    pub commit_time: Option<DateTime<Utc>>,
    pub dirty: bool,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self::from_parts(
            option_env!("LINKBOARD_GIT_COMMIT"),
            option_env!("LINKBOARD_GIT_COMMIT_TIME"),
            option_env!("LINKBOARD_GIT_DIRTY"),
        )
    }

    fn from_parts(hash: Option<&str>, time: Option<&str>, dirty: Option<&str>) -> Self {
        Self {
            commit_hash: hash.unwrap_or_default().trim().to_string(),
            commit_time: time
                .and_then(|t| DateTime::parse_from_rfc3339(t.trim()).ok())
                .map(|t| t.with_timezone(&Utc)),
            dirty: dirty.map(|d| d.trim() == "true").unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthResponse {
    pub version: String,
    pub uptime: String,
    pub last_commit_hash: String,
    pub last_commit_time: Option<DateTime<Utc>>,
    pub dirty_build: bool,
}

pub struct HealthService;

impl HealthService {
    /// GET /health
    pub async fn health_check(app_start_time: web::Data<AppStartTime>) -> HttpResponse {
        trace!("Received health check request");
        let build = BuildInfo::current();

        HttpResponse::Ok().json(HealthResponse {
            version: HEALTH_VERSION.to_string(),
            uptime: format_duration(app_start_time.started.elapsed()),
            last_commit_hash: build.commit_hash,
            last_commit_time: build.commit_time,
            dirty_build: build.dirty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_info_from_git_values() {
        let info = BuildInfo::from_parts(
            Some("0123abcd\n"),
            Some("2025-03-01T12:00:00+01:00"),
            Some("true"),
        );
        assert_eq!(info.commit_hash, "0123abcd");
        assert_eq!(
            info.commit_time.map(|t| t.to_rfc3339()),
            Some("2025-03-01T11:00:00+00:00".to_string())
        );
        assert!(info.dirty);
    }

    #[test]
    fn build_info_without_git() {
        assert_eq!(BuildInfo::from_parts(None, None, None), BuildInfo::default());
        assert_eq!(BuildInfo::from_parts(None, Some("garbage"), None).commit_time, None);
    }

    #[test]
    fn response_uses_pascal_case_keys() {
        let json = serde_json::to_value(HealthResponse {
            version: HEALTH_VERSION.into(),
            uptime: "1.5s".into(),
            last_commit_hash: String::new(),
            last_commit_time: None,
            dirty_build: false,
        })
        .unwrap();

        assert_eq!(json["Version"], "0.1");
        assert_eq!(json["Uptime"], "1.5s");
        assert!(json["LastCommitTime"].is_null());
        assert_eq!(json["DirtyBuild"], false);
    }
}
