use std::path::PathBuf;

use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::api::middleware::CacheControl;
use crate::config::StaticConfig;

pub mod assets;
pub mod frontend;
pub mod health;
pub mod links;

pub use assets::AssetService;
pub use frontend::{FrontendService, PIN_HEADER};
pub use health::{AppStartTime, BuildInfo, HEALTH_VERSION, HealthResponse, HealthService};
pub use links::LinksService;

/// Handler-facing settings, shared through `web::Data`.
#[derive(Clone, Debug)]
pub struct DashboardSettings {
    pub pin: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl DashboardSettings {
    pub fn from_config(config: &StaticConfig) -> Self {
        Self {
            pin: config.access.pin.clone(),
            upload_dir: config.uploads.dir.clone(),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}

/// 静态资源路由 `/assets`，带长期缓存头
pub fn assets_routes() -> impl HttpServiceFactory {
    web::scope("/assets")
        .wrap(CacheControl::static_assets())
        .route("/{path:.*}", web::get().to(AssetService::handle_static))
}

/// 上传文件路由 `/uploads`，不缓存
pub fn uploads_routes() -> impl HttpServiceFactory {
    web::scope("/uploads").route("/{path:.*}", web::get().to(AssetService::handle_upload))
}

/// 注册全部路由
///
/// Expects `web::Data<DashboardService>`, `web::Data<DashboardSettings>` and
/// `web::Data<AppStartTime>` on the app.
pub fn app_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(FrontendService::handle_index))
        .route("/add_form", web::get().to(FrontendService::handle_add_form))
        .route("/edit_form", web::get().to(FrontendService::handle_edit_form))
        .route("/add", web::post().to(LinksService::handle_add))
        .route("/log_click", web::post().to(LinksService::handle_log_click))
        .route("/search", web::post().to(FrontendService::handle_search))
        .route("/unlock", web::post().to(FrontendService::handle_unlock))
        .route("/lock", web::post().to(FrontendService::handle_lock))
        .route("/health", web::get().to(HealthService::health_check))
        .service(assets_routes())
        .service(uploads_routes());
}
