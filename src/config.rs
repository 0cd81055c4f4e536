use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    // Hosted backend
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub supabase_jwt_secret: Option<String>,
    pub backend_timeout_secs: u64,

    // Storage
    pub storage_bucket: String,
    pub max_upload_bytes: usize,

    /// JSON file replacing the bundled legacy project list
    pub legacy_seed_path: Option<String>,

    // Server
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub log_json: bool,
}

impl Config {
    pub const DEFAULT_BUCKET: &'static str = "personal-assets";

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        Ok(Self {
            // Hosted backend
            supabase_url: optional("SUPABASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            supabase_anon_key: optional("SUPABASE_ANON_KEY"),
            supabase_jwt_secret: optional("SUPABASE_JWT_SECRET"),
            backend_timeout_secs: env::var("BACKEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("BACKEND_TIMEOUT_SECS"))?,

            // Storage
            storage_bucket: optional("STORAGE_BUCKET")
                .unwrap_or_else(|| Self::DEFAULT_BUCKET.to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("MAX_UPLOAD_BYTES"))?,
            legacy_seed_path: optional("LEGACY_SEED_PATH"),

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            cors_origin: optional("CORS_ORIGIN"),
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Both the service URL and the public API key are present
    pub fn is_backend_configured(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_anon_key.is_some()
    }

    /// Service URL and public key, or `Missing` naming the first absent one
    pub fn backend_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let url = self
            .supabase_url
            .as_deref()
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let key = self
            .supabase_anon_key
            .as_deref()
            .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        Ok((url, key))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            supabase_jwt_secret: None,
            backend_timeout_secs: 30,
            storage_bucket: Self::DEFAULT_BUCKET.to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            legacy_seed_path: None,
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origin: None,
            log_json: false,
        }
    }
}

/// Treat unset and blank variables the same
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
