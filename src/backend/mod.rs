pub mod memory;
pub mod rest;

pub use memory::{InMemoryBackend, Operation};
pub use rest::RestBackend;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{Session, User};

/// Table names of the four content collections
pub mod tables {
    pub const PROJECTS: &str = "projects";
    pub const EXPERIENCE: &str = "experience";
    pub const SOCIALS: &str = "socials";
    pub const SITE_CONTENT: &str = "site_content";
}

/// Equality match on a single column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// A filterable, orderable read against one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub columns: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the returned columns (comma separated, `*` for all)
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push(Order {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Facade over the hosted relational, storage and identity service.
/// Every call is asynchronous and failures carry a human-readable message;
/// nothing here retries.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read rows from a table
    async fn select(&self, table: &str, query: &Query) -> AppResult<Vec<Value>>;

    /// Insert one or more rows, returning them with backend-assigned columns
    async fn insert(&self, table: &str, rows: Vec<Value>) -> AppResult<Vec<Value>>;

    /// Apply a partial record to every row matching the filter
    async fn update(&self, table: &str, patch: Value, filter: &Filter) -> AppResult<Vec<Value>>;

    /// Delete every row matching the filter
    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()>;

    /// Store raw bytes under `path` in `bucket`, returning the storage key
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String>;

    /// Publicly resolvable URL of a stored object
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Password sign-in against the identity service
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session>;

    /// Invalidate a session
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;

    /// Resolve the user owning an access token
    async fn user(&self, access_token: &str) -> AppResult<User>;

    /// Handle whose table and storage calls act on behalf of a signed-in user
    fn with_access_token(&self, access_token: &str) -> Arc<dyn Backend>;
}

/// Stand-in used when the service URL or public key is missing.
/// Every call fails with `NotConfigured` so public pages degrade per fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredBackend;

#[async_trait]
impl Backend for UnconfiguredBackend {
    async fn select(&self, _table: &str, _query: &Query) -> AppResult<Vec<Value>> {
        Err(AppError::NotConfigured)
    }

    async fn insert(&self, _table: &str, _rows: Vec<Value>) -> AppResult<Vec<Value>> {
        Err(AppError::NotConfigured)
    }

    async fn update(&self, _table: &str, _patch: Value, _filter: &Filter) -> AppResult<Vec<Value>> {
        Err(AppError::NotConfigured)
    }

    async fn delete(&self, _table: &str, _filter: &Filter) -> AppResult<()> {
        Err(AppError::NotConfigured)
    }

    async fn upload(
        &self,
        _bucket: &str,
        _path: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> AppResult<String> {
        Err(AppError::NotConfigured)
    }

    fn public_url(&self, _bucket: &str, _path: &str) -> String {
        String::new()
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> AppResult<Session> {
        Err(AppError::NotConfigured)
    }

    async fn sign_out(&self, _access_token: &str) -> AppResult<()> {
        Err(AppError::NotConfigured)
    }

    async fn user(&self, _access_token: &str) -> AppResult<User> {
        Err(AppError::NotConfigured)
    }

    fn with_access_token(&self, _access_token: &str) -> Arc<dyn Backend> {
        Arc::new(*self)
    }
}

/// Decode raw rows into typed records
pub fn decode_rows<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> AppResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(AppError::from))
        .collect()
}

/// Decode the first returned row, failing when the backend returned none
pub fn decode_first<T: serde::de::DeserializeOwned>(
    rows: Vec<Value>,
    resource: &str,
) -> AppResult<T> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(resource.to_string()))?;
    Ok(serde_json::from_value(row)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder_accumulates() {
        let query = Query::new()
            .columns("id")
            .eq("section_key", "about")
            .order_by("created_at", Direction::Descending)
            .limit(1);

        assert_eq!(query.columns.as_deref(), Some("id"));
        assert_eq!(query.filters, vec![Filter::eq("section_key", "about")]);
        assert_eq!(query.order[0].direction, Direction::Descending);
        assert_eq!(query.limit, Some(1));
    }

    #[tokio::test]
    async fn test_unconfigured_backend_fails_every_call() {
        let backend = UnconfiguredBackend;
        assert_eq!(
            backend.select(tables::PROJECTS, &Query::new()).await,
            Err(AppError::NotConfigured)
        );
        assert_eq!(
            backend.sign_in("me@example.com", "secret").await.unwrap_err(),
            AppError::NotConfigured
        );
    }
}
