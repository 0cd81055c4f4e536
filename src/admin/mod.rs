//! Content-editing workflow driven by the admin dashboard

pub mod confirm;
pub mod forms;
pub mod list_view;
pub mod migration;
pub mod schema;
pub mod session;
pub mod upload;

pub use confirm::{Confirm, Prompt};
pub use forms::{split_lines, split_list, ExperienceForm, Form, ProjectForm, SectionForm, SocialForm};
pub use list_view::{filter_items, DeleteOutcome, ListView, Searchable};
pub use migration::{LegacyImport, MigrationReport, MigrationStatus};
pub use schema::{render_field, render_section, section_schema, FieldKind, SectionSchema, SECTION_SCHEMAS};
pub use session::{EditSession, Notice, SessionState, SubmitOutcome, Submission};
pub use upload::{SelectedFile, StoredFile, UploadJob, UploadTracker};
