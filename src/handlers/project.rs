use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::admin::ProjectForm;
use crate::error::AppResult;
use crate::handlers::common::{confirmed_delete, edit_draft, search_list, submit_draft};
use crate::handlers::{ConfirmParams, SearchParams};
use crate::middlewares::AuthUser;
use crate::models::{Project, PROJECT_CATEGORIES};
use crate::repositories::ProjectRepository;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectListResponse {
    pub data: Vec<Project>,
    pub total: usize,
    /// Set when the refetch after a delete failed; `data` is then the
    /// last snapshot the server could read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectListResponse {
    pub fn new(data: Vec<Project>, error: Option<String>) -> Self {
        Self {
            total: data.len(),
            data,
            error,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectDraftResponse {
    pub draft: ProjectForm,
    pub categories: Vec<String>,
}

impl From<ProjectForm> for ProjectDraftResponse {
    fn from(draft: ProjectForm) -> Self {
        Self {
            draft,
            categories: PROJECT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectSavedResponse {
    pub data: Project,
    /// Advisory warnings about the submitted draft
    pub hints: Vec<String>,
    pub notice: Option<String>,
}

// ============ Handlers ============

/// List projects, newest first, optionally filtered by title or category
#[utoipa::path(
    get,
    path = "/api/admin/projects",
    params(SearchParams),
    responses(
        (status = 200, description = "List of projects", body = ProjectListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Fetch failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn list_projects(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ProjectListResponse>> {
    let backend = state.backend_for(&user.access_token);
    let projects =
        search_list::<ProjectRepository>(backend.as_ref(), params.search.as_deref()).await?;
    Ok(Json(ProjectListResponse::new(projects, None)))
}

/// Blank draft for a new project
#[utoipa::path(
    get,
    path = "/api/admin/projects/new",
    responses(
        (status = 200, description = "Default project draft", body = ProjectDraftResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn new_project_draft(_user: AuthUser) -> Json<ProjectDraftResponse> {
    Json(ProjectForm::default().into())
}

/// Draft prefilled from a stored project
#[utoipa::path(
    get,
    path = "/api/admin/projects/{id}/form",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project draft", body = ProjectDraftResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn edit_project_draft(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProjectDraftResponse>> {
    let backend = state.backend_for(&user.access_token);
    let draft = edit_draft::<ProjectRepository, ProjectForm>(backend.as_ref(), id).await?;
    Ok(Json(draft.into()))
}

/// Create a project from a draft
#[utoipa::path(
    post,
    path = "/api/admin/projects",
    request_body = ProjectForm,
    responses(
        (status = 200, description = "Project created", body = ProjectSavedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Backend error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn create_project(
    user: AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<ProjectForm>,
) -> AppResult<Json<ProjectSavedResponse>> {
    let backend = state.backend_for(&user.access_token);
    let saved = submit_draft(backend.as_ref(), None, draft).await?;

    Ok(Json(ProjectSavedResponse {
        data: saved.record,
        hints: saved.hints,
        notice: saved.notice,
    }))
}

/// Replace every editable field of a project
#[utoipa::path(
    put,
    path = "/api/admin/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    request_body = ProjectForm,
    responses(
        (status = 200, description = "Project updated", body = ProjectSavedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn update_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<ProjectForm>,
) -> AppResult<Json<ProjectSavedResponse>> {
    let backend = state.backend_for(&user.access_token);
    let saved = submit_draft(backend.as_ref(), Some(id), draft).await?;

    Ok(Json(ProjectSavedResponse {
        data: saved.record,
        hints: saved.hints,
        notice: saved.notice,
    }))
}

/// Delete a project once confirmed; responds with the refreshed list
#[utoipa::path(
    delete,
    path = "/api/admin/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID"),
        ConfirmParams
    ),
    responses(
        (status = 200, description = "Project deleted", body = ProjectListResponse),
        (status = 400, description = "Confirmation required"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Delete failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<Json<ProjectListResponse>> {
    let backend = state.backend_for(&user.access_token);
    let (projects, error) =
        confirmed_delete::<ProjectRepository>(backend.as_ref(), id, params.confirm).await?;

    Ok(Json(ProjectListResponse::new(projects, error)))
}
