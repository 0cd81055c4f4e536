use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::admin::ExperienceForm;
use crate::error::AppResult;
use crate::handlers::common::{confirmed_delete, edit_draft, search_list, submit_draft};
use crate::handlers::{ConfirmParams, SearchParams};
use crate::middlewares::AuthUser;
use crate::models::ExperienceItem;
use crate::repositories::ExperienceRepository;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct ExperienceListResponse {
    pub data: Vec<ExperienceItem>,
    pub total: usize,
    /// Refetch error after a delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExperienceListResponse {
    pub fn new(data: Vec<ExperienceItem>, error: Option<String>) -> Self {
        Self {
            total: data.len(),
            data,
            error,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExperienceDraftResponse {
    pub draft: ExperienceForm,
    /// Accepted values of `type`
    pub types: Vec<String>,
}

impl From<ExperienceForm> for ExperienceDraftResponse {
    fn from(draft: ExperienceForm) -> Self {
        Self {
            draft,
            types: ["work", "education", "achievement"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExperienceSavedResponse {
    pub data: ExperienceItem,
    /// Advisory warnings about the submitted draft
    pub hints: Vec<String>,
    pub notice: Option<String>,
}

// ============ Handlers ============

/// List experience entries by year, optionally filtered by title or company
#[utoipa::path(
    get,
    path = "/api/admin/experience",
    params(SearchParams),
    responses(
        (status = 200, description = "List of experience entries", body = ExperienceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Fetch failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Experience"
)]
pub async fn list_experience(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ExperienceListResponse>> {
    let backend = state.backend_for(&user.access_token);
    let items =
        search_list::<ExperienceRepository>(backend.as_ref(), params.search.as_deref()).await?;
    Ok(Json(ExperienceListResponse::new(items, None)))
}

/// Blank draft for a new experience
#[utoipa::path(
    get,
    path = "/api/admin/experience/new",
    responses(
        (status = 200, description = "Default experience draft", body = ExperienceDraftResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Experience"
)]
pub async fn new_experience_draft(_user: AuthUser) -> Json<ExperienceDraftResponse> {
    Json(ExperienceForm::default().into())
}

/// Draft prefilled from a stored experience
#[utoipa::path(
    get,
    path = "/api/admin/experience/{id}/form",
    params(
        ("id" = i64, Path, description = "Experience ID")
    ),
    responses(
        (status = 200, description = "Experience draft", body = ExperienceDraftResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Experience not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Experience"
)]
pub async fn edit_experience_draft(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ExperienceDraftResponse>> {
    let backend = state.backend_for(&user.access_token);
    let draft = edit_draft::<ExperienceRepository, ExperienceForm>(backend.as_ref(), id).await?;
    Ok(Json(draft.into()))
}

/// Create a experience from a draft
#[utoipa::path(
    post,
    path = "/api/admin/experience",
    request_body = ExperienceForm,
    responses(
        (status = 200, description = "Experience created", body = ExperienceSavedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Backend error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Experience"
)]
pub async fn create_experience(
    user: AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<ExperienceForm>,
) -> AppResult<Json<ExperienceSavedResponse>> {
    let backend = state.backend_for(&user.access_token);
    let saved = submit_draft(backend.as_ref(), None, draft).await?;

    Ok(Json(ExperienceSavedResponse {
        data: saved.record,
        hints: saved.hints,
        notice: saved.notice,
    }))
}

/// Replace every editable field of a experience
#[utoipa::path(
    put,
    path = "/api/admin/experience/{id}",
    params(
        ("id" = i64, Path, description = "Experience ID")
    ),
    request_body = ExperienceForm,
    responses(
        (status = 200, description = "Experience updated", body = ExperienceSavedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Experience not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Experience"
)]
pub async fn update_experience(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<ExperienceForm>,
) -> AppResult<Json<ExperienceSavedResponse>> {
    let backend = state.backend_for(&user.access_token);
    let saved = submit_draft(backend.as_ref(), Some(id), draft).await?;

    Ok(Json(ExperienceSavedResponse {
        data: saved.record,
        hints: saved.hints,
        notice: saved.notice,
    }))
}

/// Delete a experience once confirmed; responds with the refreshed list
#[utoipa::path(
    delete,
    path = "/api/admin/experience/{id}",
    params(
        ("id" = i64, Path, description = "Experience ID"),
        ConfirmParams
    ),
    responses(
        (status = 200, description = "Experience deleted", body = ExperienceListResponse),
        (status = 400, description = "Confirmation required"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Delete failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Experience"
)]
pub async fn delete_experience(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<Json<ExperienceListResponse>> {
    let backend = state.backend_for(&user.access_token);
    let (items, error) =
        confirmed_delete::<ExperienceRepository>(backend.as_ref(), id, params.confirm).await?;

    Ok(Json(ExperienceListResponse::new(items, error)))
}
