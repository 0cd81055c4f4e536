pub mod experience;
pub mod project;
pub mod site_content;
pub mod social;

pub use experience::ExperienceRepository;
pub use project::ProjectRepository;
pub use site_content::SiteContentRepository;
pub use social::SocialRepository;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::backend::{decode_first, decode_rows, Backend, Filter, Query};
use crate::error::{AppError, AppResult};

/// Base repository trait for the id-keyed collections.
/// Updates are whole-record and last-write-wins; nothing is locked.
#[async_trait]
pub trait Repository {
    /// Stored row
    type Record: Clone + Send + Sync;
    /// Writable fields
    type Input: Serialize + Send + Sync;

    /// Resource name used in error messages
    const RESOURCE: &'static str;

    /// All rows in the collection's default order
    async fn list(backend: &dyn Backend) -> AppResult<Vec<Self::Record>>;

    /// The row with the given id, if any
    async fn find(backend: &dyn Backend, id: i64) -> AppResult<Option<Self::Record>>;

    /// Insert a new row; the backend assigns id and created_at
    async fn insert(backend: &dyn Backend, input: &Self::Input) -> AppResult<Self::Record>;

    /// Overwrite the row with the given id
    async fn update(backend: &dyn Backend, id: i64, input: &Self::Input)
        -> AppResult<Self::Record>;

    /// Delete the row with the given id
    async fn remove(backend: &dyn Backend, id: i64) -> AppResult<()>;
}

/// Reads surface as `FetchFailed`; an unconfigured backend stays distinguishable
fn fetch_failed(err: AppError) -> AppError {
    match err {
        AppError::NotConfigured => AppError::NotConfigured,
        other => AppError::FetchFailed(other.inline_message()),
    }
}

pub(crate) async fn list_rows<T: DeserializeOwned>(
    backend: &dyn Backend,
    table: &str,
    query: &Query,
) -> AppResult<Vec<T>> {
    let rows = backend.select(table, query).await.map_err(fetch_failed)?;
    decode_rows(rows).map_err(fetch_failed)
}

pub(crate) async fn find_row<T: DeserializeOwned>(
    backend: &dyn Backend,
    table: &str,
    id: i64,
) -> AppResult<Option<T>> {
    let query = Query::new().eq("id", id).limit(1);
    let rows: Vec<T> = list_rows(backend, table, &query).await?;
    Ok(rows.into_iter().next())
}

pub(crate) async fn insert_row<I: Serialize + Sync, T: DeserializeOwned>(
    backend: &dyn Backend,
    table: &str,
    input: &I,
    resource: &str,
) -> AppResult<T> {
    let row = serde_json::to_value(input)
        .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", resource, e)))?;
    let rows = backend.insert(table, vec![row]).await?;
    decode_first(rows, resource)
}

pub(crate) async fn update_row<I: Serialize + Sync, T: DeserializeOwned>(
    backend: &dyn Backend,
    table: &str,
    id: i64,
    input: &I,
    resource: &str,
) -> AppResult<T> {
    let patch = serde_json::to_value(input)
        .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", resource, e)))?;
    let rows = backend.update(table, patch, &Filter::eq("id", id)).await?;
    decode_first(rows, resource)
}

pub(crate) async fn remove_row(backend: &dyn Backend, table: &str, id: i64) -> AppResult<()> {
    backend.delete(table, &Filter::eq("id", id)).await
}
