use serde::Serialize;
use utoipa::ToSchema;

use crate::models::ContentMap;

/// Editor widget family of a section field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Image,
    File,
}

impl FieldKind {
    /// Whether the field carries an upload control
    pub fn is_upload(self) -> bool {
        matches!(self, FieldKind::Image | FieldKind::File)
    }
}

/// One recognized key of a content section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: Option<&'static str>,
    pub help_text: Option<&'static str>,
    /// Storage bucket overriding the configured default
    pub bucket: Option<&'static str>,
    /// Shown on the public site while no value is stored
    pub fallback: &'static str,
}

impl FieldSchema {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            placeholder: None,
            help_text: None,
            bucket: None,
            fallback: "",
        }
    }

    const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    const fn help(mut self, help_text: &'static str) -> Self {
        self.help_text = Some(help_text);
        self
    }

    const fn fallback(mut self, fallback: &'static str) -> Self {
        self.fallback = fallback;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSchema {
    pub key: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldSchema],
}

impl SectionSchema {
    pub fn field(&self, key: &str) -> Option<&'static FieldSchema> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Every recognized key mapped to an empty string
    pub fn blank_content(&self) -> ContentMap {
        self.fields
            .iter()
            .map(|f| (f.key.to_string(), String::new()))
            .collect()
    }

    /// Stored content with every recognized key present.
    /// Keys outside the schema are kept untouched.
    pub fn editable_content(&self, stored: Option<ContentMap>) -> ContentMap {
        let mut content = self.blank_content();
        content.extend(stored.unwrap_or_default());
        content
    }

    /// Stored values over fallbacks; blank stored values fall back too
    pub fn display_content(&self, stored: Option<&ContentMap>) -> ContentMap {
        self.fields
            .iter()
            .map(|f| {
                let value = stored
                    .and_then(|c| c.get(f.key))
                    .filter(|v| !v.trim().is_empty())
                    .map(String::as_str)
                    .unwrap_or(f.fallback);
                (f.key.to_string(), value.to_string())
            })
            .collect()
    }
}

const ABOUT_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("badge", "Header Badge", FieldKind::Text)
        .placeholder("e.g., Get to know me")
        .fallback("Get to know me"),
    FieldSchema::new("title", "Main Title", FieldKind::Text)
        .placeholder("e.g., About Me")
        .fallback("About Me"),
    FieldSchema::new("description", "Short Description", FieldKind::Textarea)
        .placeholder("Intro paragraph...")
        .fallback("I build web and mobile applications."),
    FieldSchema::new("journey_title", "Journey Section Title", FieldKind::Text)
        .placeholder("e.g., My Journey")
        .fallback("My Journey"),
    FieldSchema::new("journey_text", "Journey Content", FieldKind::Textarea)
        .placeholder("Full Bio in HTML or Text")
        .help("Use <p> tags for paragraphs."),
    FieldSchema::new("image", "Profile Image URL", FieldKind::Image).fallback("/assets/about.png"),
];

const HERO_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("badge", "Badge", FieldKind::Text)
        .placeholder("e.g., Hello, I'm")
        .fallback("Hi, I'm"),
    FieldSchema::new("name", "Name", FieldKind::Text).placeholder("Your Name"),
    FieldSchema::new("title_1", "Job Title 1", FieldKind::Text)
        .placeholder("Full Stack Developer")
        .fallback("Full-Stack Developer"),
    FieldSchema::new("title_2", "Job Title 2", FieldKind::Text)
        .placeholder("& UI/UX Designer")
        .fallback("Systems Architect"),
    FieldSchema::new("description", "Description", FieldKind::Textarea)
        .fallback("I craft digital experiences that blend beautiful design with powerful code."),
    FieldSchema::new("cta_primary", "Primary CTA Text", FieldKind::Text)
        .placeholder("View Projects")
        .fallback("View My Work"),
    FieldSchema::new("cta_secondary", "Secondary CTA Text", FieldKind::Text)
        .placeholder("Contact Me")
        .fallback("Get In Touch"),
    FieldSchema::new("resume_url", "Resume (PDF)", FieldKind::File)
        .help("Leave empty to hide the resume button."),
];

const CONTACT_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("email", "Contact Email", FieldKind::Text).placeholder("you@example.com"),
];

/// Editable site sections, in dashboard order.
/// Adding a section only requires a new entry here.
pub const SECTION_SCHEMAS: &[SectionSchema] = &[
    SectionSchema {
        key: "hero",
        title: "Hero",
        fields: HERO_FIELDS,
    },
    SectionSchema {
        key: "about",
        title: "About",
        fields: ABOUT_FIELDS,
    },
    SectionSchema {
        key: "contact",
        title: "Contact",
        fields: CONTACT_FIELDS,
    },
];

pub fn section_schema(key: &str) -> Option<&'static SectionSchema> {
    SECTION_SCHEMAS.iter().find(|s| s.key == key)
}

/// What the editor shows for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    TextInput,
    TextArea {
        rows: u8,
    },
    Upload {
        accept: String,
        preview: Preview,
        /// Set while an upload for this field is outstanding
        uploading: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Preview {
    /// Nothing stored yet
    Empty,
    Image,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RenderedField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(flatten)]
    pub widget: Widget,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Render a single field by dispatching on its kind
pub fn render_field(field: &FieldSchema, value: &str, uploading: bool) -> RenderedField {
    let has_value = !value.trim().is_empty();
    let (widget, default_placeholder) = match field.kind {
        FieldKind::Text => (Widget::TextInput, None),
        FieldKind::Textarea => (Widget::TextArea { rows: 4 }, None),
        FieldKind::Image => (
            Widget::Upload {
                accept: "image/*".to_string(),
                preview: if has_value { Preview::Image } else { Preview::Empty },
                uploading,
            },
            Some("Image URL"),
        ),
        FieldKind::File => (
            Widget::Upload {
                accept: "application/pdf,*/*".to_string(),
                preview: if has_value { Preview::Link } else { Preview::Empty },
                uploading,
            },
            Some("File URL"),
        ),
    };

    RenderedField {
        key: field.key.to_string(),
        label: field.label.to_string(),
        kind: field.kind,
        widget,
        value: value.to_string(),
        placeholder: field.placeholder.or(default_placeholder).map(str::to_string),
        help_text: field.help_text.map(str::to_string),
    }
}

/// Render every field of a section in schema order
pub fn render_section(
    schema: &SectionSchema,
    content: &ContentMap,
    is_uploading: impl Fn(&str) -> bool,
) -> Vec<RenderedField> {
    schema
        .fields
        .iter()
        .map(|field| {
            let value = content.get(field.key).map(String::as_str).unwrap_or("");
            render_field(field, value, is_uploading(field.key))
        })
        .collect()
}
