use async_trait::async_trait;

use crate::backend::{tables, Backend, Direction, Query};
use crate::error::AppResult;
use crate::models::{SocialInput, SocialItem};
use crate::repositories::{find_row, insert_row, list_rows, remove_row, update_row, Repository};

/// Social link repository, oldest first
pub struct SocialRepository;

#[async_trait]
impl Repository for SocialRepository {
    type Record = SocialItem;
    type Input = SocialInput;

    const RESOURCE: &'static str = "Social link";

    async fn list(backend: &dyn Backend) -> AppResult<Vec<SocialItem>> {
        let query = Query::new().order_by("created_at", Direction::Ascending);
        list_rows(backend, tables::SOCIALS, &query).await
    }

    async fn find(backend: &dyn Backend, id: i64) -> AppResult<Option<SocialItem>> {
        find_row(backend, tables::SOCIALS, id).await
    }

    async fn insert(backend: &dyn Backend, input: &SocialInput) -> AppResult<SocialItem> {
        let item: SocialItem = insert_row(backend, tables::SOCIALS, input, Self::RESOURCE).await?;
        tracing::info!(id = item.id, "Social link created: {}", item.platform);
        Ok(item)
    }

    async fn update(backend: &dyn Backend, id: i64, input: &SocialInput) -> AppResult<SocialItem> {
        let item = update_row(backend, tables::SOCIALS, id, input, Self::RESOURCE).await?;
        tracing::info!(id, "Social link updated");
        Ok(item)
    }

    async fn remove(backend: &dyn Backend, id: i64) -> AppResult<()> {
        remove_row(backend, tables::SOCIALS, id).await?;
        tracing::info!(id, "Social link deleted");
        Ok(())
    }
}
