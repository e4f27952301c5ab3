//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub search: SearchConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base path of the REST backend (e.g., "http://localhost:5000/api")
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// User-Agent header sent on every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("Akwaba/{}", env!("CARGO_PKG_VERSION"))
}

/// Session persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Path of the file holding the bearer token.
    ///
    /// The single durable value the client keeps; its presence on disk
    /// is the sole input to session restoration at startup.
    pub token_path: PathBuf,
}

/// Search behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Debounce window for search-as-you-type, in milliseconds
    pub debounce_ms: u64,
    /// Minimum query length that triggers a backend call
    pub min_query_len: usize,
}

/// Background polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Interval for notification / pending-request polling, in seconds
    pub interval_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (AKWABA_*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("api.base_url", "http://localhost:5000/api")?
            .set_default("api.timeout_seconds", 30)?
            .set_default("session.token_path", ".akwaba/token")?
            .set_default("search.debounce_ms", 350)?
            .set_default("search.min_query_len", 2)?
            .set_default("polling.interval_seconds", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (AKWABA_*)
            .add_source(
                Environment::with_prefix("AKWABA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), crate::error::AppError> {
        let parsed = url::Url::parse(&self.api.base_url)
            .map_err(|e| crate::error::AppError::Config(format!("api.base_url: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(crate::error::AppError::Config(
                "api.base_url must use http or https".to_string(),
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.search.debounce_ms == 0 {
            return Err(crate::error::AppError::Config(
                "search.debounce_ms must be greater than 0".to_string(),
            ));
        }

        if self.polling.interval_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "polling.interval_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl ApiConfig {
    /// Base URL with any trailing slash removed, so route paths
    /// (which always start with '/') concatenate cleanly.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }
}
