//! Configuration types for link-bundler

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

/// Public service address settings
///
/// `address` is both the host the server binds to and the base of the
/// download links handed to clients.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceConfig {
    /// Host name or URL base (default: "localhost")
    #[serde(default = "default_address")]
    pub address: String,

    /// TCP port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

impl ServiceConfig {
    /// Base URL for links handed to clients, e.g. `http://localhost:8080`
    pub fn public_base(&self) -> String {
        let address = self.address.trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            format!("{}:{}", address, self.port)
        } else {
            format!("http://{}:{}", address, self.port)
        }
    }

    /// Host part of `address`, without scheme, for binding the listener
    pub fn bind_host(&self) -> &str {
        self.address
            .trim_start_matches("http://")
            .trim_start_matches("https://")
            .trim_end_matches('/')
    }
}

/// Task admission and processing limits
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskConfig {
    /// Accepted link extensions, including the leading dot
    /// (default: [".png", ".jpg", ".jpeg", ".pdf"])
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Links collected per task before processing starts (default: 3)
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Maximum number of concurrently registered tasks (default: 3)
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,

    /// Timeout applied to every individual fetch (default: 30 seconds)
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub fetch_timeout: Duration,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_links: default_max_links(),
            max_tasks: default_max_tasks(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for the bundler service
///
/// Loaded once at startup and shared read-only as `Arc<Config>`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Public address and port
    #[serde(default)]
    pub service: ServiceConfig,

    /// Task limits and fetch behaviour
    #[serde(default)]
    pub tasks: TaskConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Recognized variables: `ADDRESS`, `PORT`, `EXT` (colon-separated
    /// extensions), `MAX_LINKS`, `MAX_TASKS`, `FETCH_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(Error::Config {
                    message: format!("failed to load .env file: {}", e),
                    key: None,
                });
            }
        }
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Unset variables keep their defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(address) = lookup("ADDRESS").filter(|a| !a.trim().is_empty()) {
            config.service.address = address.trim().to_string();
        }
        if let Some(port) = lookup("PORT") {
            config.service.port = parse_var("PORT", &port)?;
        }
        if let Some(exts) = lookup("EXT") {
            config.tasks.allowed_extensions = parse_extensions(&exts);
        }
        if let Some(max_links) = lookup("MAX_LINKS") {
            config.tasks.max_links = parse_var("MAX_LINKS", &max_links)?;
        }
        if let Some(max_tasks) = lookup("MAX_TASKS") {
            config.tasks.max_tasks = parse_var("MAX_TASKS", &max_tasks)?;
        }
        if let Some(secs) = lookup("FETCH_TIMEOUT_SECS") {
            config.tasks.fetch_timeout =
                Duration::from_secs(parse_var("FETCH_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Check that limits are usable
    pub fn validate(&self) -> Result<()> {
        if self.tasks.max_links == 0 {
            return Err(config_error("max_links must be at least 1", "MAX_LINKS"));
        }
        if self.tasks.max_tasks == 0 {
            return Err(config_error("max_tasks must be at least 1", "MAX_TASKS"));
        }
        if self.tasks.allowed_extensions.is_empty() {
            return Err(config_error(
                "at least one allowed extension is required",
                "EXT",
            ));
        }
        if self.tasks.fetch_timeout.is_zero() {
            return Err(config_error(
                "fetch timeout must be greater than zero",
                "FETCH_TIMEOUT_SECS",
            ));
        }
        Ok(())
    }
}

fn config_error(message: &str, key: &str) -> Error {
    Error::Config {
        message: message.to_string(),
        key: Some(key.to_string()),
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| Error::Config {
        message: format!("invalid value {:?} for {}: {}", value, key, e),
        key: Some(key.to_string()),
    })
}

/// Split a colon-separated extension list, adding the leading dot where missing
fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(':')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| {
            if e.starts_with('.') {
                e.to_string()
            } else {
                format!(".{}", e)
            }
        })
        .collect()
}

// Default value functions
fn default_address() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_allowed_extensions() -> Vec<String> {
    vec![".png".into(), ".jpg".into(), ".jpeg".into(), ".pdf".into()]
}

fn default_max_links() -> usize {
    3
}

fn default_max_tasks() -> usize {
    3
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
