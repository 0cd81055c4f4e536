use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::admin::UploadTracker;
use crate::backend::{Backend, RestBackend, UnconfiguredBackend};
use crate::config::Config;
use crate::error::AppError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Hosted backend, or a stand-in that fails every call when unconfigured
    pub backend: Arc<dyn Backend>,
    pub config: Config,
    /// Fields with an upload outstanding, per operator
    pub uploads: Arc<Mutex<HashMap<Uuid, UploadTracker>>>,
    /// Held while the legacy import runs
    pub migration: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    /// Build state from configuration. A missing service URL or key is not
    /// fatal: public pages keep serving fallbacks and login reports it.
    pub fn new(config: Config) -> Result<Self, AppStateError> {
        let backend: Arc<dyn Backend> = match RestBackend::from_config(&config) {
            Ok(backend) => Arc::new(backend),
            Err(AppError::NotConfigured) => {
                tracing::warn!("SUPABASE_URL or SUPABASE_ANON_KEY missing; backend not configured");
                Arc::new(UnconfiguredBackend)
            }
            Err(e) => return Err(AppStateError::Backend(e.to_string())),
        };
        Ok(Self::with_backend(config, backend))
    }

    /// Create AppState with a custom backend (for testing)
    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            config,
            uploads: Arc::new(Mutex::new(HashMap::new())),
            migration: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Backend handle acting with the operator's access token
    pub fn backend_for(&self, access_token: &str) -> Arc<dyn Backend> {
        self.backend.with_access_token(access_token)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Backend client error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_fall_back_to_unconfigured() {
        let state = AppState::new(Config::default()).unwrap();
        assert_eq!(
            state.backend.select("projects", &Default::default()).await,
            Err(AppError::NotConfigured)
        );
    }

    #[test]
    fn test_invalid_url_is_fatal() {
        let config = Config {
            supabase_url: Some("not a url".to_string()),
            supabase_anon_key: Some("anon".to_string()),
            ..Config::default()
        };
        assert!(AppState::new(config).is_err());
    }
}
