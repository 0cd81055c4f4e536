use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::null_as_default;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceType {
    #[default]
    Work,
    Education,
    Achievement,
}

/// Stored rows may carry `null` or a label the app does not know; both read as `Work`
fn type_or_work<'de, D>(deserializer: D) -> Result<ExperienceType, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(match label.as_deref().map(str::trim) {
        Some(l) if l.eq_ignore_ascii_case("education") => ExperienceType::Education,
        Some(l) if l.eq_ignore_ascii_case("achievement") => ExperienceType::Achievement,
        _ => ExperienceType::Work,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExperienceItem {
    pub id: i64,
    /// Free text such as "2024 - Present"; only ever compared as a string
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(rename = "type", default, deserialize_with = "type_or_work")]
    pub kind: ExperienceType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExperienceInput {
    pub year: String,
    pub title: String,
    pub company: String,
    #[serde(rename = "type", default)]
    pub kind: ExperienceType,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_column_round_trips_lowercase() {
        let input = ExperienceInput {
            year: "2023".to_string(),
            title: "BSc Computer Science".to_string(),
            company: "University".to_string(),
            kind: ExperienceType::Education,
            description: "Graduated".to_string(),
            skills: vec![],
        };

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["type"], json!("education"));
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_missing_type_defaults_to_work() {
        let item: ExperienceItem = serde_json::from_value(json!({
            "id": 3, "year": "2021", "title": "Engineer", "company": "Acme"
        }))
        .unwrap();
        assert_eq!(item.kind, ExperienceType::Work);
    }

    #[test]
    fn test_null_or_unknown_type_reads_as_work() {
        let rows: Vec<ExperienceItem> = serde_json::from_value(json!([
            {"id": 1, "year": "2020", "title": "Intern", "company": "Acme", "type": null, "skills": null},
            {"id": 2, "year": "2019", "title": "Hackathon", "company": "MLH", "type": "award"},
            {"id": 3, "year": "2018", "title": "BSc", "company": "Uni", "type": "Education"}
        ]))
        .unwrap();

        assert_eq!(rows[0].kind, ExperienceType::Work);
        assert!(rows[0].skills.is_empty());
        assert_eq!(rows[1].kind, ExperienceType::Work);
        assert_eq!(rows[2].kind, ExperienceType::Education);
    }
}
