use serde::Serialize;
use std::path::Path;
use utoipa::ToSchema;

use crate::admin::confirm::Confirm;
use crate::backend::Backend;
use crate::error::{AppError, AppResult};
use crate::models::ProjectInput;
use crate::repositories::{ProjectRepository, Repository};

pub const MIGRATION_PROMPT: &str = "This will import default projects into your database. Continue?";

const BUNDLED_SEED: &str = include_str!("../../seed/legacy_projects.json");

/// The project list shipped with the site before it had a database
pub fn bundled_seed() -> AppResult<Vec<ProjectInput>> {
    parse_seed(BUNDLED_SEED)
}

/// A replacement seed list read from disk
pub async fn load_seed(path: impl AsRef<Path>) -> AppResult<Vec<ProjectInput>> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Internal(format!("Failed to read seed file {}: {}", path.display(), e))
    })?;
    parse_seed(&raw)
}

fn parse_seed(raw: &str) -> AppResult<Vec<ProjectInput>> {
    serde_json::from_str(raw).map_err(|e| AppError::Internal(format!("Invalid seed data: {}", e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStatus {
    /// Projects already exist
    Unavailable,
    Cancelled,
    Completed,
    /// Halted mid-sequence; earlier inserts remain
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MigrationReport {
    pub status: MigrationStatus,
    pub total: usize,
    pub inserted: usize,
    /// 1-based position of the entry that failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MigrationReport {
    fn new(status: MigrationStatus, total: usize) -> Self {
        Self {
            status,
            total,
            inserted: 0,
            failed_at: None,
            error: None,
        }
    }
}

/// One-shot import of legacy projects into an empty projects table
#[derive(Debug, Clone)]
pub struct LegacyImport {
    entries: Vec<ProjectInput>,
}

impl LegacyImport {
    pub fn new(entries: Vec<ProjectInput>) -> Self {
        Self { entries }
    }

    pub fn bundled() -> AppResult<Self> {
        Ok(Self::new(bundled_seed()?))
    }

    pub fn entries(&self) -> &[ProjectInput] {
        &self.entries
    }

    /// Offered only while the projects table is empty
    pub async fn is_available(backend: &dyn Backend) -> AppResult<bool> {
        ProjectRepository::is_empty(backend).await
    }

    /// Insert every entry in order. A failed insert stops the run and
    /// nothing already inserted is rolled back; rerunning duplicates rows.
    pub async fn run(
        &self,
        backend: &dyn Backend,
        confirm: &mut impl Confirm,
    ) -> AppResult<MigrationReport> {
        let total = self.entries.len();
        if !Self::is_available(backend).await? {
            return Ok(MigrationReport::new(MigrationStatus::Unavailable, total));
        }
        if !confirm.confirm(MIGRATION_PROMPT) {
            return Ok(MigrationReport::new(MigrationStatus::Cancelled, total));
        }

        let mut report = MigrationReport::new(MigrationStatus::Completed, total);
        for (index, entry) in self.entries.iter().enumerate() {
            if let Err(e) = ProjectRepository::insert(backend, entry).await {
                tracing::error!(
                    entry = index + 1,
                    inserted = report.inserted,
                    "Legacy import halted: {}",
                    e
                );
                report.status = MigrationStatus::Failed;
                report.failed_at = Some(index + 1);
                report.error = Some(e.inline_message());
                return Ok(report);
            }
            report.inserted += 1;
        }

        tracing::info!(inserted = report.inserted, "Legacy projects imported");
        Ok(report)
    }
}
