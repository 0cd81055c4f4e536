use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::admin::{
    section_schema, Form, SectionForm, SelectedFile, StoredFile, UploadJob, UploadTracker,
};
use crate::error::{AppError, AppResult};
use crate::middlewares::AuthUser;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadParams {
    /// Form field the file is for; also names the stored object
    pub field: String,
    pub file_name: String,
    /// Site section whose schema declares the field
    pub section: Option<String>,
    /// Bucket override when the field declares none
    pub bucket: Option<String>,
}

/// Marks one operator's field busy for the lifetime of the request
struct UploadSlot {
    uploads: Arc<Mutex<HashMap<Uuid, UploadTracker>>>,
    user_id: Uuid,
    field: String,
}

impl UploadSlot {
    fn acquire(state: &AppState, user_id: Uuid, field: &str) -> AppResult<Self> {
        let mut uploads = state
            .uploads
            .lock()
            .map_err(|_| AppError::Internal("Upload tracker poisoned".to_string()))?;
        uploads.entry(user_id).or_default().begin(field)?;

        Ok(Self {
            uploads: state.uploads.clone(),
            user_id,
            field: field.to_string(),
        })
    }
}

impl Drop for UploadSlot {
    fn drop(&mut self) {
        if let Ok(mut uploads) = self.uploads.lock() {
            if let Some(tracker) = uploads.get_mut(&self.user_id) {
                tracker.finish(&self.field);
                if !tracker.any() {
                    uploads.remove(&self.user_id);
                }
            }
        }
    }
}

/// Bucket for a field: the section schema's declaration, then the
/// request override, then the configured default
fn target_bucket(state: &AppState, params: &UploadParams) -> AppResult<String> {
    let declared = match &params.section {
        Some(key) => {
            let schema =
                section_schema(key).ok_or_else(|| AppError::NotFound("Section".to_string()))?;
            SectionForm::new(schema, None).upload_bucket(&params.field)?
        }
        None => None,
    };

    Ok(declared
        .or_else(|| params.bucket.clone().filter(|b| !b.trim().is_empty()))
        .unwrap_or_else(|| state.config.storage_bucket.clone()))
}

// ============ Handlers ============

/// Upload a file to storage and return its public URL.
/// The URL is not written to any record until the form is saved.
#[utoipa::path(
    post,
    path = "/api/admin/uploads",
    params(UploadParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "File stored", body = StoredFile),
        (status = 400, description = "No file selected, or the section has no such upload field"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown section"),
        (status = 409, description = "Upload already in progress for this field"),
        (status = 502, description = "Upload failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Uploads"
)]
pub async fn upload_file(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<StoredFile>> {
    let bucket = target_bucket(&state, &params)?;

    let file = SelectedFile {
        file_name: params.file_name.clone(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            // a generic type defers to the file extension
            .filter(|value| !value.is_empty() && *value != "application/octet-stream")
            .map(str::to_string),
        bytes: body.to_vec(),
    };
    let job = UploadJob::new(&params.field, &bucket, file)?;

    let _slot = UploadSlot::acquire(&state, user.id, &params.field)?;
    let backend = state.backend_for(&user.access_token);
    let result = job.run(backend.as_ref()).await;

    Ok(Json(result.outcome?))
}
