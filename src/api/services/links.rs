//! Link creation and click tracking

use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use super::DashboardSettings;
use super::frontend::html;
use crate::api::render;
use crate::errors::{LinkboardError, Result};
use crate::services::{ClickOutcome, DashboardService, normalize_new_link};
use crate::storage::NewLink;
use crate::utils::upload::unique_upload_name;

#[derive(Debug, Default, Deserialize)]
pub struct ClickForm {
    pub id: Option<String>,
}

/// An icon part read from the multipart payload.
struct IconUpload {
    filename: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct AddLinkForm {
    name: String,
    url: String,
    category: Option<String>,
    colour: Option<String>,
    icon: Option<IconUpload>,
}

/// Tracks the bytes read across all parts against the configured cap.
struct PayloadBudget {
    used: usize,
    limit: usize,
}

impl PayloadBudget {
    fn take(&mut self, len: usize) -> Result<()> {
        self.used = self.used.saturating_add(len);
        if self.used > self.limit {
            return Err(LinkboardError::validation(format!(
                "Form too large: maximum is {} MiB",
                self.limit / 1024 / 1024
            )));
        }
        Ok(())
    }
}

async fn read_field(field: &mut Field, budget: &mut PayloadBudget) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| {
            LinkboardError::validation(format!("Invalid multipart data: {}", e))
        })?;
        budget.take(bytes.len())?;
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}

async fn read_text(field: &mut Field, budget: &mut PayloadBudget) -> Result<String> {
    let data = read_field(field, budget).await?;
    String::from_utf8(data).map_err(|_| LinkboardError::validation("Form fields must be UTF-8"))
}

async fn parse_add_form(mut payload: Multipart, limit: usize) -> Result<AddLinkForm> {
    let mut form = AddLinkForm::default();
    let mut budget = PayloadBudget { used: 0, limit };

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            LinkboardError::validation(format!("Invalid multipart data: {}", e))
        })?;
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => form.name = read_text(&mut field, &mut budget).await?,
            "url" => form.url = read_text(&mut field, &mut budget).await?,
            "category" => form.category = Some(read_text(&mut field, &mut budget).await?),
            "colour" => form.colour = Some(read_text(&mut field, &mut budget).await?),
            "icon" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("")
                    .to_string();
                let data = read_field(&mut field, &mut budget).await?;

                // 空文件名表示浏览器没有选择文件
                if !filename.is_empty() && !data.is_empty() {
                    form.icon = Some(IconUpload { filename, data });
                }
            }
            other => {
                debug!("Ignoring unknown multipart field: {}", other);
                read_field(&mut field, &mut budget).await?;
            }
        }
    }

    Ok(form)
}

async fn save_icon(upload_dir: &Path, icon: &IconUpload) -> Result<PathBuf> {
    let file_name = unique_upload_name(&icon.filename, Utc::now().timestamp());
    let path = upload_dir.join(&file_name);

    tokio::fs::write(&path, &icon.data).await.map_err(|e| {
        LinkboardError::file_operation(format!("Failed to save icon {}: {}", path.display(), e))
    })?;

    debug!("Icon saved: {} ({} bytes)", path.display(), icon.data.len());
    Ok(path)
}

async fn discard_icon(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove orphaned icon {}: {}", path.display(), e);
    }
}

pub struct LinksService;

impl LinksService {
    /// POST /add (multipart: name, url, category, colour, icon)
    pub async fn handle_add(
        payload: Multipart,
        dashboard: web::Data<DashboardService>,
        settings: web::Data<DashboardSettings>,
    ) -> Result<HttpResponse> {
        let form = parse_add_form(payload, settings.max_upload_bytes).await?;

        // 先校验再落盘，避免无效请求留下孤儿文件
        let mut new_link = normalize_new_link(NewLink {
            name: form.name,
            url: form.url,
            icon: None,
            category: form.category,
            colour: form.colour,
        })?;

        let saved_icon = match &form.icon {
            Some(icon) => Some(save_icon(&settings.upload_dir, icon).await?),
            None => None,
        };
        new_link.icon = saved_icon.as_ref().and_then(|path| {
            path.file_name()
                .map(|name| format!("/uploads/{}", name.to_string_lossy()))
        });

        let id = match dashboard.create_link(new_link).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(path) = &saved_icon {
                    discard_icon(path).await;
                }
                return Err(e);
            }
        };
        info!("Link {} created via dashboard", id);

        let groups = dashboard.groups().await?;
        Ok(html(render::links(&groups, true)))
    }

    /// POST /log_click (form: id)
    ///
    /// Best effort: only a store failure changes the response.
    pub async fn handle_log_click(
        dashboard: web::Data<DashboardService>,
        form: Option<web::Form<ClickForm>>,
    ) -> HttpResponse {
        let raw_id = form.and_then(|f| f.into_inner().id);

        match dashboard.record_click(raw_id.as_deref()).await {
            ClickOutcome::Recorded | ClickOutcome::Ignored => HttpResponse::NoContent().finish(),
            ClickOutcome::Failed => {
                error!("Click could not be recorded");
                HttpResponse::InternalServerError()
                    .content_type("text/plain; charset=utf-8")
                    .body(crate::errors::GENERIC_INTERNAL_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PayloadBudget;

    #[test]
    fn budget_rejects_oversized_payloads() {
        let mut budget = PayloadBudget {
            used: 0,
            limit: 10,
        };
        assert!(budget.take(6).is_ok());
        assert!(budget.take(4).is_ok());
        assert!(budget.take(1).is_err());
    }
}
