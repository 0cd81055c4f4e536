use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::admin::SocialForm;
use crate::error::AppResult;
use crate::handlers::common::{confirmed_delete, edit_draft, search_list, submit_draft};
use crate::handlers::{ConfirmParams, SearchParams};
use crate::middlewares::AuthUser;
use crate::models::{SocialIcon, SocialItem};
use crate::repositories::SocialRepository;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct SocialListResponse {
    pub data: Vec<SocialItem>,
    pub total: usize,
    /// Refetch error after a delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SocialListResponse {
    pub fn new(data: Vec<SocialItem>, error: Option<String>) -> Self {
        Self {
            total: data.len(),
            data,
            error,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SocialDraftResponse {
    pub draft: SocialForm,
    /// Icon names the footer can render
    pub icons: Vec<String>,
}

impl From<SocialForm> for SocialDraftResponse {
    fn from(draft: SocialForm) -> Self {
        Self {
            draft,
            icons: SocialIcon::ALL.iter().map(|icon| icon.name().to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SocialSavedResponse {
    pub data: SocialItem,
    pub hints: Vec<String>,
    pub notice: Option<String>,
}

// ============ Handlers ============

/// List social links, oldest first, optionally filtered by platform or URL
#[utoipa::path(
    get,
    path = "/api/admin/socials",
    params(SearchParams),
    responses(
        (status = 200, description = "List of socials", body = SocialListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Fetch failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Socials"
)]
pub async fn list_socials(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SocialListResponse>> {
    let backend = state.backend_for(&user.access_token);
    let items =
        search_list::<SocialRepository>(backend.as_ref(), params.search.as_deref()).await?;
    Ok(Json(SocialListResponse::new(items, None)))
}

/// Blank draft for a new social link
#[utoipa::path(
    get,
    path = "/api/admin/socials/new",
    responses(
        (status = 200, description = "Default social link draft", body = SocialDraftResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Socials"
)]
pub async fn new_social_draft(_user: AuthUser) -> Json<SocialDraftResponse> {
    Json(SocialForm::default().into())
}

/// Draft prefilled from a stored social link
#[utoipa::path(
    get,
    path = "/api/admin/socials/{id}/form",
    params(
        ("id" = i64, Path, description = "Social link ID")
    ),
    responses(
        (status = 200, description = "Social link draft", body = SocialDraftResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Social link not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Socials"
)]
pub async fn edit_social_draft(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SocialDraftResponse>> {
    let backend = state.backend_for(&user.access_token);
    let draft = edit_draft::<SocialRepository, SocialForm>(backend.as_ref(), id).await?;
    Ok(Json(draft.into()))
}

/// Create a social link from a draft
#[utoipa::path(
    post,
    path = "/api/admin/socials",
    request_body = SocialForm,
    responses(
        (status = 200, description = "Social link created", body = SocialSavedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Backend error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Socials"
)]
pub async fn create_social(
    user: AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<SocialForm>,
) -> AppResult<Json<SocialSavedResponse>> {
    let backend = state.backend_for(&user.access_token);
    let saved = submit_draft(backend.as_ref(), None, draft).await?;

    Ok(Json(SocialSavedResponse {
        data: saved.record,
        hints: saved.hints,
        notice: saved.notice,
    }))
}

/// Replace every editable field of a social link
#[utoipa::path(
    put,
    path = "/api/admin/socials/{id}",
    params(
        ("id" = i64, Path, description = "Social link ID")
    ),
    request_body = SocialForm,
    responses(
        (status = 200, description = "Social link updated", body = SocialSavedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Social link not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Socials"
)]
pub async fn update_social(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<SocialForm>,
) -> AppResult<Json<SocialSavedResponse>> {
    let backend = state.backend_for(&user.access_token);
    let saved = submit_draft(backend.as_ref(), Some(id), draft).await?;

    Ok(Json(SocialSavedResponse {
        data: saved.record,
        hints: saved.hints,
        notice: saved.notice,
    }))
}

/// Delete a social link once confirmed; responds with the refreshed list
#[utoipa::path(
    delete,
    path = "/api/admin/socials/{id}",
    params(
        ("id" = i64, Path, description = "Social link ID"),
        ConfirmParams
    ),
    responses(
        (status = 200, description = "Social link deleted", body = SocialListResponse),
        (status = 400, description = "Confirmation required"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Delete failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Socials"
)]
pub async fn delete_social(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<Json<SocialListResponse>> {
    let backend = state.backend_for(&user.access_token);
    let (items, error) =
        confirmed_delete::<SocialRepository>(backend.as_ref(), id, params.confirm).await?;

    Ok(Json(SocialListResponse::new(items, error)))
}
