use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::handlers::{ExperienceListResponse, ProjectListResponse};
use crate::services::{DisplayService, FooterLink};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub backend_configured: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GalleryParams {
    /// Exact category, or "All"
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FooterLinksResponse {
    pub data: Vec<FooterLink>,
}

// ============ Handlers ============

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Public"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend_configured: state.config.is_backend_configured(),
    })
}

/// Project gallery. An unreachable backend yields an empty list.
#[utoipa::path(
    get,
    path = "/api/projects",
    params(GalleryParams),
    responses(
        (status = 200, description = "Projects, newest first", body = ProjectListResponse)
    ),
    tag = "Public"
)]
pub async fn project_gallery(
    State(state): State<AppState>,
    Query(params): Query<GalleryParams>,
) -> Json<ProjectListResponse> {
    let category = params.category.as_deref().unwrap_or("All");
    let projects = DisplayService::gallery(state.backend.as_ref(), category).await;
    Json(ProjectListResponse::new(projects, None))
}

#[utoipa::path(
    get,
    path = "/api/experience",
    responses(
        (status = 200, description = "Experience timeline", body = ExperienceListResponse)
    ),
    tag = "Public"
)]
pub async fn experience_timeline(State(state): State<AppState>) -> Json<ExperienceListResponse> {
    let items = DisplayService::timeline(state.backend.as_ref()).await;
    Json(ExperienceListResponse::new(items, None))
}

#[utoipa::path(
    get,
    path = "/api/socials",
    responses(
        (status = 200, description = "Footer social links", body = FooterLinksResponse)
    ),
    tag = "Public"
)]
pub async fn footer_links(State(state): State<AppState>) -> Json<FooterLinksResponse> {
    Json(FooterLinksResponse {
        data: DisplayService::footer_links(state.backend.as_ref()).await,
    })
}
