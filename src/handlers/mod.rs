pub mod auth;
pub mod common;
pub mod content;
pub mod experience;
pub mod migration;
pub mod project;
pub mod public;
pub mod social;
pub mod upload;

pub use auth::{login, logout, me};
pub use common::{ConfirmParams, SearchParams};
pub use content::{
    get_section_content, get_section_editor, list_sections, save_section, SaveSectionRequest,
    SectionContentResponse, SectionEditorResponse, SectionListResponse, SectionSavedResponse,
    SectionSummary,
};
pub use experience::{
    create_experience, delete_experience, edit_experience_draft, list_experience,
    new_experience_draft, update_experience, ExperienceDraftResponse, ExperienceListResponse,
    ExperienceSavedResponse,
};
pub use migration::{migration_status, run_migration, MigrationAvailabilityResponse};
pub use project::{
    create_project, delete_project, edit_project_draft, list_projects, new_project_draft,
    update_project, ProjectDraftResponse, ProjectListResponse, ProjectSavedResponse,
};
pub use public::{
    experience_timeline, footer_links, health, project_gallery, FooterLinksResponse,
    GalleryParams, HealthResponse,
};
pub use social::{
    create_social, delete_social, edit_social_draft, list_socials, new_social_draft,
    update_social, SocialDraftResponse, SocialListResponse, SocialSavedResponse,
};
pub use upload::{upload_file, UploadParams};
