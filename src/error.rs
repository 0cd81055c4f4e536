use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type shared by the backend facade, the admin workflow and
/// the HTTP handlers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error("Backend is not configured")]
    NotConfigured,

    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthorized")]
    Unauthorized,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    // Double-dispatch guard
    #[error("{0} already in progress")]
    Busy(String),

    // Backend errors
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Backend error: {0}")]
    Backend(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Message suitable for an inline, scoped error near the triggering control
    pub fn inline_message(&self) -> String {
        match self {
            AppError::Backend(msg) | AppError::FetchFailed(msg) | AppError::Validation(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            // 503 Service Unavailable
            AppError::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Not configured",
                Some("Backend URL and public key must be set before signing in".to_string()),
            ),

            // 401 Unauthorized
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token", None),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired", None),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),

            // 404 Not Found
            AppError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, "Not found", Some(resource.clone()))
            }

            // 400 Bad Request
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::ConfirmationRequired(msg) => (
                StatusCode::BAD_REQUEST,
                "Confirmation required",
                Some(msg.clone()),
            ),

            // 409 Conflict
            AppError::Busy(what) => (
                StatusCode::CONFLICT,
                "Already in progress",
                Some(what.clone()),
            ),

            // 502 Bad Gateway
            AppError::FetchFailed(msg) => {
                tracing::error!("Fetch failed: {}", msg);
                (StatusCode::BAD_GATEWAY, "Fetch failed", Some(msg.clone()))
            }
            AppError::Backend(msg) => {
                tracing::error!("Backend error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Backend error", Some(msg.clone()))
            }

            // 500 Internal Server Error
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

// Convenient conversions from common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Backend(format!("Unexpected response shape: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    }
}

/// Result type alias for handlers and workflow operations
pub type AppResult<T> = Result<T, AppError>;
