use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Field key to string value, shaped by the section's field schema
pub type ContentMap = BTreeMap<String, String>;

/// One row per section key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SiteContentSection {
    pub id: i64,
    pub section_key: String,
    #[serde(default, deserialize_with = "content_map")]
    pub content: ContentMap,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub updated_at: Option<OffsetDateTime>,
}

/// Accepts any JSON object; non-string values are rendered to text
fn content_map<'de, D>(deserializer: D) -> Result<ContentMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Map<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}
