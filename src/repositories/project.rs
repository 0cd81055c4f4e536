use async_trait::async_trait;

use crate::backend::{tables, Backend, Direction, Query};
use crate::error::AppResult;
use crate::models::{Project, ProjectInput};
use crate::repositories::{find_row, insert_row, list_rows, remove_row, update_row, Repository};

/// Project repository, newest first
pub struct ProjectRepository;

#[async_trait]
impl Repository for ProjectRepository {
    type Record = Project;
    type Input = ProjectInput;

    const RESOURCE: &'static str = "Project";

    async fn list(backend: &dyn Backend) -> AppResult<Vec<Project>> {
        let query = Query::new().order_by("created_at", Direction::Descending);
        list_rows(backend, tables::PROJECTS, &query).await
    }

    async fn find(backend: &dyn Backend, id: i64) -> AppResult<Option<Project>> {
        find_row(backend, tables::PROJECTS, id).await
    }

    async fn insert(backend: &dyn Backend, input: &ProjectInput) -> AppResult<Project> {
        let project: Project = insert_row(backend, tables::PROJECTS, input, Self::RESOURCE).await?;
        tracing::info!(id = project.id, "Project created: {}", project.title);
        Ok(project)
    }

    async fn update(backend: &dyn Backend, id: i64, input: &ProjectInput) -> AppResult<Project> {
        let project = update_row(backend, tables::PROJECTS, id, input, Self::RESOURCE).await?;
        tracing::info!(id, "Project updated");
        Ok(project)
    }

    async fn remove(backend: &dyn Backend, id: i64) -> AppResult<()> {
        remove_row(backend, tables::PROJECTS, id).await?;
        tracing::info!(id, "Project deleted");
        Ok(())
    }
}

impl ProjectRepository {
    /// Whether the table currently holds no rows
    pub async fn is_empty(backend: &dyn Backend) -> AppResult<bool> {
        let query = Query::new().columns("id").limit(1);
        let rows: Vec<serde_json::Value> = list_rows(backend, tables::PROJECTS, &query).await?;
        Ok(rows.is_empty())
    }

    /// Public gallery: newest first, restricted to one category unless "All"
    pub async fn list_in_category(backend: &dyn Backend, category: &str) -> AppResult<Vec<Project>> {
        let projects = Self::list(backend).await?;
        Ok(projects
            .into_iter()
            .filter(|p| p.in_category(category))
            .collect())
    }
}
