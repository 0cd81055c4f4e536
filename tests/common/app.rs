use std::sync::Arc;

use axum_test::TestServer;
use folio_cms::backend::{Backend, InMemoryBackend};
use folio_cms::build_router;
use folio_cms::config::Config;
use folio_cms::state::AppState;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_upload_bytes: 1024 * 1024,
        ..Config::default()
    }
}

/// Test application wrapper
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    /// Same store the server writes to
    pub backend: InMemoryBackend,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        // Use InMemoryBackend for testing (no hosted project needed)
        let backend = InMemoryBackend::new();
        backend.require_session_for_writes().await;

        let shared: Arc<dyn Backend> = Arc::new(backend.clone());
        let state = AppState::with_backend(config, shared);

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            backend,
        }
    }
}
