use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::null_as_default;

/// Category labels offered by the project editor.
/// Stored as free text; the backend does not constrain it.
pub const PROJECT_CATEGORIES: [&str; 5] = ["Web", "Mobile", "AI", "Cybersecurity", "Other"];

pub const DEFAULT_PROJECT_CATEGORY: &str = "Web";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub long_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub live_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<OffsetDateTime>,
}

/// Persisted project fields (no id, no created_at); written whole on insert and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub live_link: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl Project {
    /// The record's writable fields
    pub fn to_input(&self) -> ProjectInput {
        ProjectInput {
            title: self.title.clone(),
            description: self.description.clone(),
            long_description: self.long_description.clone(),
            image: self.image.clone(),
            images: self.images.clone(),
            tags: self.tags.clone(),
            category: self.category.clone(),
            github_link: self.github_link.clone(),
            live_link: self.live_link.clone(),
            featured: self.featured,
        }
    }

    /// Gallery filter: "All" (any case) matches everything, otherwise exact category
    pub fn in_category(&self, category: &str) -> bool {
        category.eq_ignore_ascii_case("all") || self.category == category
    }
}
