use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use utoipa::ToSchema;

use crate::admin::schema::{section_schema, SectionSchema};
use crate::backend::Backend;
use crate::error::{AppError, AppResult};
use crate::models::{
    non_blank, ContentMap, ExperienceInput, ExperienceItem, ExperienceType, Project,
    ProjectInput, SiteContentSection, SocialIcon, SocialInput, SocialItem, DEFAULT_PROJECT_CATEGORY,
    PROJECT_CATEGORIES,
};
use crate::repositories::{
    ExperienceRepository, ProjectRepository, Repository, SiteContentRepository, SocialRepository,
};

/// Split a comma-separated list, trimming tokens and dropping empty ones
pub fn split_list(input: &str) -> Vec<String> {
    split_on(input, ',')
}

/// Split a newline-separated list, trimming lines and dropping empty ones
pub fn split_lines(input: &str) -> Vec<String> {
    split_on(input, '\n')
}

fn split_on(input: &str, separator: char) -> Vec<String> {
    input
        .split(separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn require(missing: &mut Vec<&'static str>, name: &'static str, value: &str) {
    if value.trim().is_empty() {
        missing.push(name);
    }
}

fn missing_fields(missing: Vec<&'static str>) -> AppResult<()> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "Missing required fields: {}",
        missing.join(", ")
    )))
}

fn link_hint(label: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.starts_with("http://") || value.starts_with("https://") {
        return None;
    }
    Some(format!("{} does not look like an http(s) URL", label))
}

fn upload_target_missing(form: &str, field: &str) -> AppError {
    AppError::Validation(format!("{} has no upload field `{}`", form, field))
}

/// The editable working copy of one entity.
/// `create` and `update` issue exactly one repository write each.
#[async_trait]
pub trait Form: Clone + Send + Sync {
    /// Stored record the draft is loaded from
    type Record: Clone + Send + Sync;
    /// Identity of an existing record
    type Key: Clone + PartialEq + Debug + Send + Sync;

    /// Shown once a submit succeeds
    const SAVED_NOTICE: &'static str = "Saved successfully!";

    fn key_of(record: &Self::Record) -> Self::Key;

    fn from_record(record: &Self::Record) -> Self;

    /// Required-field check, run before any network call
    fn validate(&self) -> AppResult<()>;

    /// Non-blocking format warnings
    fn hints(&self) -> Vec<String> {
        Vec::new()
    }

    /// Bucket override for an upload field; `Err` when the field takes no uploads
    fn upload_bucket(&self, field: &str) -> AppResult<Option<String>>;

    /// Apply an uploaded file's public URL to the draft
    fn apply_upload(&mut self, field: &str, url: &str) -> AppResult<()>;

    async fn create(&self, backend: &dyn Backend) -> AppResult<Self::Record>;

    async fn update(&self, backend: &dyn Backend, key: &Self::Key) -> AppResult<Self::Record>;
}

/// Project draft; tags and images are held in their editable text form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub image: String,
    /// One URL per line
    pub images_input: String,
    /// Comma-separated
    pub tags_input: String,
    pub category: String,
    pub github_link: String,
    pub live_link: String,
    pub featured: bool,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            long_description: String::new(),
            image: String::new(),
            images_input: String::new(),
            tags_input: String::new(),
            category: DEFAULT_PROJECT_CATEGORY.to_string(),
            github_link: String::new(),
            live_link: String::new(),
            featured: false,
        }
    }
}

impl ProjectForm {
    /// The normalized record written on submit
    pub fn to_input(&self) -> ProjectInput {
        ProjectInput {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            long_description: self.long_description.clone(),
            image: self.image.trim().to_string(),
            images: split_lines(&self.images_input),
            tags: split_list(&self.tags_input),
            category: self.category.clone(),
            github_link: non_blank(&self.github_link),
            live_link: non_blank(&self.live_link),
            featured: self.featured,
        }
    }
}

#[async_trait]
impl Form for ProjectForm {
    type Record = Project;
    type Key = i64;

    fn key_of(record: &Project) -> i64 {
        record.id
    }

    fn from_record(record: &Project) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            long_description: record.long_description.clone(),
            image: record.image.clone(),
            images_input: record.images.join("\n"),
            tags_input: record.tags.join(", "),
            category: record.category.clone(),
            github_link: record.github_link.clone().unwrap_or_default(),
            live_link: record.live_link.clone().unwrap_or_default(),
            featured: record.featured,
        }
    }

    fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();
        require(&mut missing, "title", &self.title);
        require(&mut missing, "description", &self.description);
        missing_fields(missing)
    }

    fn hints(&self) -> Vec<String> {
        let mut hints: Vec<String> = [
            link_hint("GitHub link", &self.github_link),
            link_hint("Live link", &self.live_link),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !PROJECT_CATEGORIES.contains(&self.category.as_str()) {
            hints.push(format!(
                "Category `{}` is not one of {}",
                self.category,
                PROJECT_CATEGORIES.join(", ")
            ));
        }
        hints
    }

    fn upload_bucket(&self, field: &str) -> AppResult<Option<String>> {
        match field {
            "image" | "images" => Ok(None),
            other => Err(upload_target_missing("Project", other)),
        }
    }

    fn apply_upload(&mut self, field: &str, url: &str) -> AppResult<()> {
        match field {
            "image" => self.image = url.to_string(),
            "images" => {
                if !self.images_input.trim().is_empty() && !self.images_input.ends_with('\n') {
                    self.images_input.push('\n');
                }
                self.images_input.push_str(url);
            }
            other => return Err(upload_target_missing("Project", other)),
        }
        Ok(())
    }

    async fn create(&self, backend: &dyn Backend) -> AppResult<Project> {
        ProjectRepository::insert(backend, &self.to_input()).await
    }

    async fn update(&self, backend: &dyn Backend, id: &i64) -> AppResult<Project> {
        ProjectRepository::update(backend, *id, &self.to_input()).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ExperienceForm {
    pub year: String,
    pub title: String,
    pub company: String,
    #[serde(rename = "type")]
    pub kind: ExperienceType,
    pub description: String,
    /// Comma-separated
    pub skills_input: String,
}

impl ExperienceForm {
    pub fn to_input(&self) -> ExperienceInput {
        ExperienceInput {
            year: self.year.trim().to_string(),
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            kind: self.kind,
            description: self.description.trim().to_string(),
            skills: split_list(&self.skills_input),
        }
    }
}

#[async_trait]
impl Form for ExperienceForm {
    type Record = ExperienceItem;
    type Key = i64;

    fn key_of(record: &ExperienceItem) -> i64 {
        record.id
    }

    fn from_record(record: &ExperienceItem) -> Self {
        Self {
            year: record.year.clone(),
            title: record.title.clone(),
            company: record.company.clone(),
            kind: record.kind,
            description: record.description.clone(),
            skills_input: record.skills.join(", "),
        }
    }

    fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();
        require(&mut missing, "title", &self.title);
        require(&mut missing, "company", &self.company);
        require(&mut missing, "year", &self.year);
        require(&mut missing, "description", &self.description);
        missing_fields(missing)
    }

    fn upload_bucket(&self, field: &str) -> AppResult<Option<String>> {
        Err(upload_target_missing("Experience", field))
    }

    fn apply_upload(&mut self, field: &str, _url: &str) -> AppResult<()> {
        Err(upload_target_missing("Experience", field))
    }

    async fn create(&self, backend: &dyn Backend) -> AppResult<ExperienceItem> {
        ExperienceRepository::insert(backend, &self.to_input()).await
    }

    async fn update(&self, backend: &dyn Backend, id: &i64) -> AppResult<ExperienceItem> {
        ExperienceRepository::update(backend, *id, &self.to_input()).await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SocialForm {
    pub platform: String,
    pub url: String,
    pub icon_name: String,
}

impl Default for SocialForm {
    fn default() -> Self {
        Self {
            platform: String::new(),
            url: String::new(),
            icon_name: SocialIcon::default().name().to_string(),
        }
    }
}

impl SocialForm {
    pub fn to_input(&self) -> SocialInput {
        SocialInput {
            platform: self.platform.trim().to_string(),
            url: self.url.trim().to_string(),
            icon_name: self.icon_name.clone(),
        }
    }
}

#[async_trait]
impl Form for SocialForm {
    type Record = SocialItem;
    type Key = i64;

    fn key_of(record: &SocialItem) -> i64 {
        record.id
    }

    fn from_record(record: &SocialItem) -> Self {
        Self {
            platform: record.platform.clone(),
            url: record.url.clone(),
            icon_name: record.icon_name.clone(),
        }
    }

    fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();
        require(&mut missing, "platform", &self.platform);
        require(&mut missing, "url", &self.url);
        missing_fields(missing)
    }

    fn hints(&self) -> Vec<String> {
        let url = self.url.trim();
        let mut hints = Vec::new();
        if !url.starts_with("mailto:") {
            hints.extend(link_hint("URL", url));
        }
        if SocialIcon::from_name(&self.icon_name).name() != self.icon_name {
            hints.push(format!(
                "Icon `{}` is unknown and will show as Globe",
                self.icon_name
            ));
        }
        hints
    }

    fn upload_bucket(&self, field: &str) -> AppResult<Option<String>> {
        Err(upload_target_missing("Social link", field))
    }

    fn apply_upload(&mut self, field: &str, _url: &str) -> AppResult<()> {
        Err(upload_target_missing("Social link", field))
    }

    async fn create(&self, backend: &dyn Backend) -> AppResult<SocialItem> {
        SocialRepository::insert(backend, &self.to_input()).await
    }

    async fn update(&self, backend: &dyn Backend, id: &i64) -> AppResult<SocialItem> {
        SocialRepository::update(backend, *id, &self.to_input()).await
    }
}

/// Draft of one site section's content map, shaped by its schema
#[derive(Debug, Clone, PartialEq)]
pub struct SectionForm {
    pub schema: &'static SectionSchema,
    pub content: ContentMap,
}

impl SectionForm {
    /// A draft with every schema key present
    pub fn new(schema: &'static SectionSchema, content: Option<ContentMap>) -> Self {
        Self {
            schema,
            content: schema.editable_content(content),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.content.insert(key.to_string(), value.into());
    }
}

#[async_trait]
impl Form for SectionForm {
    type Record = SiteContentSection;
    type Key = String;

    const SAVED_NOTICE: &'static str = "Content saved successfully!";

    fn key_of(record: &SiteContentSection) -> String {
        record.section_key.clone()
    }

    /// Sections without a registered schema keep their content but render no fields
    fn from_record(record: &SiteContentSection) -> Self {
        static UNREGISTERED: SectionSchema = SectionSchema {
            key: "",
            title: "",
            fields: &[],
        };
        let schema = section_schema(&record.section_key).unwrap_or(&UNREGISTERED);
        Self::new(schema, Some(record.content.clone()))
    }

    fn validate(&self) -> AppResult<()> {
        if self.schema.key.is_empty() {
            return Err(AppError::Validation("Unknown content section".to_string()));
        }
        Ok(())
    }

    fn hints(&self) -> Vec<String> {
        self.schema
            .fields
            .iter()
            .filter(|f| f.kind.is_upload())
            .filter_map(|f| {
                let value = self.content.get(f.key)?;
                if value.starts_with('/') {
                    return None;
                }
                link_hint(f.label, value)
            })
            .collect()
    }

    fn upload_bucket(&self, field: &str) -> AppResult<Option<String>> {
        match self.schema.field(field) {
            Some(f) if f.kind.is_upload() => Ok(f.bucket.map(str::to_string)),
            _ => Err(upload_target_missing(self.schema.title, field)),
        }
    }

    fn apply_upload(&mut self, field: &str, url: &str) -> AppResult<()> {
        self.upload_bucket(field)?;
        self.set(field, url);
        Ok(())
    }

    async fn create(&self, backend: &dyn Backend) -> AppResult<SiteContentSection> {
        SiteContentRepository::save(backend, self.schema.key, &self.content).await
    }

    async fn update(&self, backend: &dyn Backend, key: &String) -> AppResult<SiteContentSection> {
        SiteContentRepository::save(backend, key, &self.content).await
    }
}
