use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::admin::migration::{load_seed, MIGRATION_PROMPT};
use crate::admin::{LegacyImport, MigrationReport, MigrationStatus};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::handlers::ConfirmParams;
use crate::middlewares::AuthUser;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct MigrationAvailabilityResponse {
    /// True only while the projects table is empty
    pub available: bool,
    /// Projects the import would insert
    pub entries: usize,
}

async fn legacy_import(config: &Config) -> AppResult<LegacyImport> {
    match &config.legacy_seed_path {
        Some(path) => Ok(LegacyImport::new(load_seed(path).await?)),
        None => LegacyImport::bundled(),
    }
}

// ============ Handlers ============

/// Whether the legacy project import can be offered
#[utoipa::path(
    get,
    path = "/api/admin/migration",
    responses(
        (status = 200, description = "Import availability", body = MigrationAvailabilityResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Fetch failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Migration"
)]
pub async fn migration_status(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<MigrationAvailabilityResponse>> {
    let backend = state.backend_for(&user.access_token);
    let import = legacy_import(&state.config).await?;

    Ok(Json(MigrationAvailabilityResponse {
        available: LegacyImport::is_available(backend.as_ref()).await?,
        entries: import.entries().len(),
    }))
}

/// Import the legacy projects once confirmed.
/// Inserts run in order and stop at the first failure; earlier inserts stay.
#[utoipa::path(
    post,
    path = "/api/admin/migration",
    params(ConfirmParams),
    responses(
        (status = 200, description = "Import finished, or unavailable because projects exist", body = MigrationReport),
        (status = 400, description = "Confirmation required"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Import already in progress"),
        (status = 502, description = "Import halted partway", body = MigrationReport)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Migration"
)]
pub async fn run_migration(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<(StatusCode, Json<MigrationReport>)> {
    let _running = state
        .migration
        .try_lock()
        .map_err(|_| AppError::Busy("Migration".to_string()))?;

    let import = legacy_import(&state.config).await?;
    let backend = state.backend_for(&user.access_token);
    let mut confirm = params.confirm;
    let report = import.run(backend.as_ref(), &mut confirm).await?;

    match report.status {
        MigrationStatus::Cancelled => Err(AppError::ConfirmationRequired(
            MIGRATION_PROMPT.to_string(),
        )),
        MigrationStatus::Failed => Ok((StatusCode::BAD_GATEWAY, Json(report))),
        MigrationStatus::Unavailable | MigrationStatus::Completed => {
            Ok((StatusCode::OK, Json(report)))
        }
    }
}
