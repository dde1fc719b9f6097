//! Service configuration loaded from `CATALOG_*` environment variables

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

use auth::jwt::DEFAULT_TOKEN_TTL_SECONDS;

/// Which repositories back the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// API service configuration
///
/// # Environment Variables
/// - `CATALOG_HOST`: bind address (default: "0.0.0.0")
/// - `CATALOG_PORT`: bind port (default: 3001)
/// - `CATALOG_STORAGE`: "postgres" or "memory" (default: "postgres")
/// - `CATALOG_UPLOAD_DIR`: poster directory (default: "./uploads")
/// - `CATALOG_JWT_SECRET`: session signing secret (required)
/// - `CATALOG_TOKEN_TTL_SECONDS`: session lifetime (default: 604800)
/// - `CATALOG_COOKIE_SECURE`: mark cookies `Secure` (default: false)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_seconds: u64,
    pub cookie_secure: bool,
}

impl ApiConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("CATALOG"))
    }

    /// Load from a given environment source, applying defaults
    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let config: ApiConfig = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001_i64)?
            .set_default("storage", "postgres")?
            .set_default("upload_dir", "./uploads")?
            .set_default("token_ttl_seconds", DEFAULT_TOKEN_TTL_SECONDS as i64)?
            .set_default("cookie_secure", false)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "CATALOG_JWT_SECRET must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// `host:port` to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
