// Library crate for the portfolio content backend
// Exports modules for use by the server binary and tests

pub mod admin;
pub mod backend;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{
    create_experience, create_project, create_social, delete_experience, delete_project,
    delete_social, edit_experience_draft, edit_project_draft, edit_social_draft,
    experience_timeline, footer_links, get_section_content, get_section_editor, health,
    list_experience, list_projects, list_sections, list_socials, login, logout, me,
    migration_status, new_experience_draft, new_project_draft, new_social_draft, project_gallery,
    run_migration, save_section, update_experience, update_project, update_social, upload_file,
};
use crate::middlewares::auth_middleware;
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.max_upload_bytes;

    // Protected routes (require a signed-in operator)
    let protected_routes = Router::new()
        // Auth routes
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        // Project routes
        .route("/api/admin/projects", get(list_projects).post(create_project))
        .route("/api/admin/projects/new", get(new_project_draft))
        .route("/api/admin/projects/{id}/form", get(edit_project_draft))
        .route(
            "/api/admin/projects/{id}",
            put(update_project).delete(delete_project),
        )
        // Experience routes
        .route(
            "/api/admin/experience",
            get(list_experience).post(create_experience),
        )
        .route("/api/admin/experience/new", get(new_experience_draft))
        .route("/api/admin/experience/{id}/form", get(edit_experience_draft))
        .route(
            "/api/admin/experience/{id}",
            put(update_experience).delete(delete_experience),
        )
        // Social link routes
        .route("/api/admin/socials", get(list_socials).post(create_social))
        .route("/api/admin/socials/new", get(new_social_draft))
        .route("/api/admin/socials/{id}/form", get(edit_social_draft))
        .route(
            "/api/admin/socials/{id}",
            put(update_social).delete(delete_social),
        )
        // Site content routes
        .route("/api/admin/content", get(list_sections))
        .route(
            "/api/admin/content/{section}",
            get(get_section_editor).put(save_section),
        )
        // Uploads
        .route(
            "/api/admin/uploads",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload)),
        )
        // Legacy import
        .route(
            "/api/admin/migration",
            get(migration_status).post(run_migration),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/api/health", get(health))
        // Public auth routes
        .route("/api/auth/login", post(login))
        // Public display routes
        .route("/api/projects", get(project_gallery))
        .route("/api/experience", get(experience_timeline))
        .route("/api/socials", get(footer_links))
        .route("/api/content/{section}", get(get_section_content))
        // Protected routes
        .merge(protected_routes)
        .with_state(state)
}
