use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::admin::schema::RenderedField;
use crate::admin::{
    render_section, section_schema, SectionForm, SectionSchema, SECTION_SCHEMAS,
};
use crate::error::{AppError, AppResult};
use crate::handlers::common::submit_draft;
use crate::middlewares::AuthUser;
use crate::models::{ContentMap, SiteContentSection};
use crate::repositories::SiteContentRepository;
use crate::services::DisplayService;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionSummary {
    pub key: String,
    pub title: String,
    pub fields: Vec<String>,
}

impl From<&SectionSchema> for SectionSummary {
    fn from(schema: &SectionSchema) -> Self {
        Self {
            key: schema.key.to_string(),
            title: schema.title.to_string(),
            fields: schema.fields.iter().map(|f| f.key.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionListResponse {
    pub data: Vec<SectionSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionEditorResponse {
    pub section_key: String,
    pub title: String,
    /// False until the section is first saved
    pub exists: bool,
    pub content: ContentMap,
    pub fields: Vec<RenderedField>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveSectionRequest {
    pub content: ContentMap,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionSavedResponse {
    pub data: SiteContentSection,
    pub hints: Vec<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionContentResponse {
    pub section_key: String,
    pub content: ContentMap,
}

fn schema_for(key: &str) -> AppResult<&'static SectionSchema> {
    section_schema(key).ok_or_else(|| AppError::NotFound("Section".to_string()))
}

// ============ Handlers ============

/// Editable site sections
#[utoipa::path(
    get,
    path = "/api/admin/content",
    responses(
        (status = 200, description = "Registered sections", body = SectionListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Site Content"
)]
pub async fn list_sections(_user: AuthUser) -> Json<SectionListResponse> {
    Json(SectionListResponse {
        data: SECTION_SCHEMAS.iter().map(SectionSummary::from).collect(),
    })
}

/// Section editor: stored values over blank defaults, rendered per field
#[utoipa::path(
    get,
    path = "/api/admin/content/{section}",
    params(
        ("section" = String, Path, description = "Section key")
    ),
    responses(
        (status = 200, description = "Section editor", body = SectionEditorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Section not found"),
        (status = 502, description = "Fetch failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Site Content"
)]
pub async fn get_section_editor(
    user: AuthUser,
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> AppResult<Json<SectionEditorResponse>> {
    let schema = schema_for(&section)?;
    let backend = state.backend_for(&user.access_token);

    let stored = SiteContentRepository::get_by_key(backend.as_ref(), schema.key).await?;
    let exists = stored.is_some();
    let content = schema.editable_content(stored);

    let fields = {
        let uploads = state
            .uploads
            .lock()
            .map_err(|_| AppError::Internal("Upload tracker poisoned".to_string()))?;
        let tracker = uploads.get(&user.id);
        render_section(schema, &content, |field| {
            tracker.is_some_and(|t| t.is_uploading(field))
        })
    };

    Ok(Json(SectionEditorResponse {
        section_key: schema.key.to_string(),
        title: schema.title.to_string(),
        exists,
        content,
        fields,
    }))
}

/// Save a section, creating its row on first save
#[utoipa::path(
    put,
    path = "/api/admin/content/{section}",
    params(
        ("section" = String, Path, description = "Section key")
    ),
    request_body = SaveSectionRequest,
    responses(
        (status = 200, description = "Section saved", body = SectionSavedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Section not found"),
        (status = 502, description = "Backend error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Site Content"
)]
pub async fn save_section(
    user: AuthUser,
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(payload): Json<SaveSectionRequest>,
) -> AppResult<Json<SectionSavedResponse>> {
    let schema = schema_for(&section)?;
    let backend = state.backend_for(&user.access_token);

    let mut draft = SectionForm::new(schema, None);
    for (key, value) in payload.content {
        draft.set(&key, value);
    }

    let saved = submit_draft(backend.as_ref(), Some(schema.key.to_string()), draft).await?;
    Ok(Json(SectionSavedResponse {
        data: saved.record,
        hints: saved.hints,
        notice: saved.notice,
    }))
}

/// Public section content; blank or missing values fall back to defaults
#[utoipa::path(
    get,
    path = "/api/content/{section}",
    params(
        ("section" = String, Path, description = "Section key")
    ),
    responses(
        (status = 200, description = "Section content", body = SectionContentResponse),
        (status = 404, description = "Section not found")
    ),
    tag = "Public"
)]
pub async fn get_section_content(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> AppResult<Json<SectionContentResponse>> {
    let content = DisplayService::section(state.backend.as_ref(), &section).await?;
    Ok(Json(SectionContentResponse {
        section_key: section,
        content,
    }))
}
