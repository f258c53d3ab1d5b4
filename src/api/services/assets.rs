//! Static assets (embedded) and uploaded icons (filesystem)

use actix_web::{HttpRequest, HttpResponse, web};
use rust_embed::Embed;
use tracing::{debug, trace};

use super::DashboardSettings;
use crate::errors::{LinkboardError, Result};
use crate::utils::upload::{content_type_for, is_safe_relative_path};

// 使用 RustEmbed 把 assets/ 编译进二进制
#[derive(Embed)]
#[folder = "assets/"]
struct StaticAssets;

pub struct AssetService;

impl AssetService {
    /// GET /assets/{path}
    pub async fn handle_static(req: HttpRequest) -> HttpResponse {
        let path = req.match_info().query("path");
        trace!("Serving static file: {}", path);

        match StaticAssets::get(path) {
            Some(content) => HttpResponse::Ok()
                .content_type(content_type_for(path))
                .body(content.data.into_owned()),
            None => {
                debug!("Static file not found: {}", path);
                HttpResponse::NotFound().body("File not found")
            }
        }
    }

    /// GET /uploads/{path}
    pub async fn handle_upload(
        req: HttpRequest,
        settings: web::Data<DashboardSettings>,
    ) -> Result<HttpResponse> {
        let path = req.match_info().query("path");
        if !is_safe_relative_path(path) {
            debug!("Rejected upload path: {}", path);
            return Err(LinkboardError::not_found("File not found"));
        }

        let full_path = settings.upload_dir.join(path);
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(HttpResponse::Ok()
                .content_type(content_type_for(path))
                .body(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LinkboardError::not_found("File not found"))
            }
            Err(e) => Err(LinkboardError::file_operation(format!(
                "Failed to read {}: {}",
                full_path.display(),
                e
            ))),
        }
    }
}
