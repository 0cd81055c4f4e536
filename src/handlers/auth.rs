use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middlewares::AuthUser;
use crate::models::{Credentials, Session};
use crate::services::AuthService;
use crate::state::AppState;

// ============ Handlers ============

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Signed in", body = Session),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 503, description = "Backend not configured")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> AppResult<Json<Session>> {
    let session = AuthService::login(state.backend.as_ref(), &payload).await?;
    Ok(Json(session))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn logout(user: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    AuthService::logout(state.backend.as_ref(), &user.access_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the signed-in operator
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current operator", body = AuthUser),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn me(user: AuthUser) -> Json<AuthUser> {
    Json(user)
}
