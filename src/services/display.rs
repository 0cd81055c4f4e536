use serde::Serialize;
use utoipa::ToSchema;

use crate::admin::schema::section_schema;
use crate::backend::Backend;
use crate::error::{AppError, AppResult};
use crate::models::{ContentMap, ExperienceItem, Project, SocialIcon, SocialItem};
use crate::repositories::{
    ExperienceRepository, ProjectRepository, Repository, SiteContentRepository, SocialRepository,
};

/// A footer social link with its icon resolved
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FooterLink {
    pub platform: String,
    pub url: String,
    pub icon: SocialIcon,
}

impl From<SocialItem> for FooterLink {
    fn from(item: SocialItem) -> Self {
        Self {
            icon: item.icon(),
            platform: item.platform,
            url: item.url,
        }
    }
}

/// Read contracts of the public site. A failed fetch degrades to an
/// empty list or the section's fallbacks and is only logged.
pub struct DisplayService;

impl DisplayService {
    /// Project gallery for one category, or everything for "All"
    pub async fn gallery(backend: &dyn Backend, category: &str) -> Vec<Project> {
        ProjectRepository::list_in_category(backend, category)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Project gallery unavailable: {}", e);
                Vec::new()
            })
    }

    pub async fn timeline(backend: &dyn Backend) -> Vec<ExperienceItem> {
        ExperienceRepository::list(backend)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Experience timeline unavailable: {}", e);
                Vec::new()
            })
    }

    pub async fn footer_links(backend: &dyn Backend) -> Vec<FooterLink> {
        match SocialRepository::list(backend).await {
            Ok(items) => items.into_iter().map(FooterLink::from).collect(),
            Err(e) => {
                tracing::warn!("Social links unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Stored section content over the schema's fallbacks.
    /// Only an unknown section key is an error.
    pub async fn section(backend: &dyn Backend, key: &str) -> AppResult<ContentMap> {
        let schema = section_schema(key).ok_or_else(|| AppError::NotFound("Section".to_string()))?;

        let stored = SiteContentRepository::get_by_key(backend, key)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(section = key, "Section content unavailable: {}", e);
                None
            });
        Ok(schema.display_content(stored.as_ref()))
    }
}
