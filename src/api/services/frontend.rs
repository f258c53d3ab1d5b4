//! Page and fragment handlers
//!
//! Locked/unlocked is not server state: `/unlock` re-renders the UI with edit
//! affordances when the `HX-Prompt` header carries the PIN, `/lock` renders
//! it without them.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{debug, trace, warn};

use super::DashboardSettings;
use crate::api::render;
use crate::errors::{INVALID_PIN, LinkboardError, Result};
use crate::services::DashboardService;

/// Header htmx fills with the answer to `hx-prompt`.
pub const PIN_HEADER: &str = "HX-Prompt";

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditQuery {
    pub id: Option<String>,
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Constant-time comparison against the configured PIN.
pub fn pin_matches(supplied: &str, expected: &str) -> bool {
    bool::from(supplied.as_bytes().ct_eq(expected.as_bytes()))
}

pub struct FrontendService;

impl FrontendService {
    /// GET /
    pub async fn handle_index(dashboard: web::Data<DashboardService>) -> Result<HttpResponse> {
        trace!("Serving dashboard page");
        let groups = dashboard.groups().await?;
        Ok(html(render::page(&groups)))
    }

    /// POST /search
    pub async fn handle_search(
        dashboard: web::Data<DashboardService>,
        form: Option<web::Form<SearchForm>>,
    ) -> Result<HttpResponse> {
        let term = form.map(|f| f.into_inner().search).unwrap_or_default();
        debug!("Search request: '{}'", term);

        let groups = dashboard.search_groups(&term).await?;
        Ok(html(render::links(&groups, false)))
    }

    /// POST /unlock
    pub async fn handle_unlock(
        req: HttpRequest,
        dashboard: web::Data<DashboardService>,
        settings: web::Data<DashboardSettings>,
    ) -> Result<HttpResponse> {
        let supplied = req
            .headers()
            .get(PIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !pin_matches(supplied, &settings.pin) {
            warn!("Unlock rejected: invalid PIN");
            return Err(LinkboardError::unauthorized(INVALID_PIN));
        }

        let groups = dashboard.groups().await?;
        Ok(html(render::ui(&groups, true)))
    }

    /// POST /lock
    pub async fn handle_lock(dashboard: web::Data<DashboardService>) -> Result<HttpResponse> {
        let groups = dashboard.groups().await?;
        Ok(html(render::ui(&groups, false)))
    }

    /// GET /add_form
    pub async fn handle_add_form() -> HttpResponse {
        html(render::modal(&render::add_link_form()))
    }

    /// GET /edit_form?id=
    pub async fn handle_edit_form(
        dashboard: web::Data<DashboardService>,
        query: Option<web::Query<EditQuery>>,
    ) -> Result<HttpResponse> {
        let id = query
            .and_then(|q| q.into_inner().id)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| LinkboardError::validation("Invalid Link ID"))?;

        let link = dashboard.get_link(id).await.map_err(|e| match e {
            LinkboardError::NotFound(_) => LinkboardError::not_found("Link not found"),
            other => other,
        })?;

        Ok(html(render::modal(&render::edit_link_form(&link))))
    }
}
