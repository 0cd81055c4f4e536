use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use folio_cms::admin::schema::{FieldKind, Preview, RenderedField, Widget};
use folio_cms::admin::{
    ExperienceForm, MigrationReport, MigrationStatus, ProjectForm, SocialForm, StoredFile,
};
use folio_cms::config::Config;
use folio_cms::handlers::{
    ExperienceDraftResponse, ExperienceListResponse, ExperienceSavedResponse, FooterLinksResponse,
    HealthResponse, MigrationAvailabilityResponse, ProjectDraftResponse, ProjectListResponse,
    ProjectSavedResponse, SaveSectionRequest, SectionContentResponse, SectionEditorResponse,
    SectionListResponse, SectionSavedResponse, SectionSummary, SocialDraftResponse,
    SocialListResponse, SocialSavedResponse,
};
use folio_cms::models::{
    AuthUser, Credentials, ExperienceItem, ExperienceType, Project, Session, SiteContentSection,
    SocialIcon, SocialItem, User,
};
use folio_cms::services::FooterLink;
use folio_cms::state::AppState;
use folio_cms::{build_router, handlers};

/// Security scheme for Bearer token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::public::health,
        handlers::public::project_gallery,
        handlers::public::experience_timeline,
        handlers::public::footer_links,
        handlers::content::get_section_content,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::project::list_projects,
        handlers::project::new_project_draft,
        handlers::project::edit_project_draft,
        handlers::project::create_project,
        handlers::project::update_project,
        handlers::project::delete_project,
        handlers::experience::list_experience,
        handlers::experience::new_experience_draft,
        handlers::experience::edit_experience_draft,
        handlers::experience::create_experience,
        handlers::experience::update_experience,
        handlers::experience::delete_experience,
        handlers::social::list_socials,
        handlers::social::new_social_draft,
        handlers::social::edit_social_draft,
        handlers::social::create_social,
        handlers::social::update_social,
        handlers::social::delete_social,
        handlers::content::list_sections,
        handlers::content::get_section_editor,
        handlers::content::save_section,
        handlers::upload::upload_file,
        handlers::migration::migration_status,
        handlers::migration::run_migration,
    ),
    components(schemas(
        HealthResponse,
        Credentials,
        Session,
        User,
        AuthUser,
        Project,
        ProjectForm,
        ProjectListResponse,
        ProjectDraftResponse,
        ProjectSavedResponse,
        ExperienceItem,
        ExperienceType,
        ExperienceForm,
        ExperienceListResponse,
        ExperienceDraftResponse,
        ExperienceSavedResponse,
        SocialItem,
        SocialIcon,
        SocialForm,
        SocialListResponse,
        SocialDraftResponse,
        SocialSavedResponse,
        FooterLink,
        FooterLinksResponse,
        SiteContentSection,
        SectionSummary,
        SectionListResponse,
        SectionEditorResponse,
        SaveSectionRequest,
        SectionSavedResponse,
        SectionContentResponse,
        FieldKind,
        Widget,
        Preview,
        RenderedField,
        StoredFile,
        MigrationStatus,
        MigrationReport,
        MigrationAvailabilityResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Public", description = "Read endpoints behind the public site"),
        (name = "Auth", description = "Operator sign-in endpoints"),
        (name = "Projects", description = "Project management endpoints"),
        (name = "Experience", description = "Experience timeline management endpoints"),
        (name = "Socials", description = "Social link management endpoints"),
        (name = "Site Content", description = "Schema-driven section editing"),
        (name = "Uploads", description = "File storage for upload fields"),
        (name = "Migration", description = "One-time legacy project import")
    )
)]
struct ApiDoc;

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    Ok(match &config.cors_origin {
        Some(origin) => layer.allow_origin(origin.parse::<HeaderValue>()?),
        None => layer.allow_origin(Any),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let addr = config.server_addr();
    let cors = cors_layer(&config)?;

    // Initialize application state (no network calls happen here)
    let state = AppState::new(config)?;

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
