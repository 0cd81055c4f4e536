use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::backend::{decode_first, tables, Backend, Filter, Query};
use crate::error::{AppError, AppResult};
use crate::models::{ContentMap, SiteContentSection};
use crate::repositories::list_rows;

/// Site content repository, keyed by the unique `section_key`
pub struct SiteContentRepository;

impl SiteContentRepository {
    const RESOURCE: &'static str = "Site content";

    /// The section row, if one exists
    pub async fn find(backend: &dyn Backend, key: &str) -> AppResult<Option<SiteContentSection>> {
        let query = Query::new().eq("section_key", key).limit(1);
        let rows: Vec<SiteContentSection> = list_rows(backend, tables::SITE_CONTENT, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// The section's content map, if a row exists
    pub async fn get_by_key(backend: &dyn Backend, key: &str) -> AppResult<Option<ContentMap>> {
        Ok(Self::find(backend, key).await?.map(|section| section.content))
    }

    /// Upsert: update the existing row's content, or insert a new row.
    /// Check-then-write; safe for a single operator only.
    pub async fn save(
        backend: &dyn Backend,
        key: &str,
        content: &ContentMap,
    ) -> AppResult<SiteContentSection> {
        let existing = backend
            .select(
                tables::SITE_CONTENT,
                &Query::new().columns("id").eq("section_key", key).limit(1),
            )
            .await?;

        let updated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| AppError::Internal(format!("Failed to format timestamp: {}", e)))?;

        let rows = if existing.is_empty() {
            backend
                .insert(
                    tables::SITE_CONTENT,
                    vec![json!({
                        "section_key": key,
                        "content": content,
                        "updated_at": updated_at,
                    })],
                )
                .await?
        } else {
            backend
                .update(
                    tables::SITE_CONTENT,
                    json!({ "content": content, "updated_at": updated_at }),
                    &Filter::eq("section_key", key),
                )
                .await?
        };

        let section: SiteContentSection = decode_first(rows, Self::RESOURCE)?;
        tracing::info!(section = key, "Site content saved");
        Ok(section)
    }
}
