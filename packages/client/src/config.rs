use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio::fs;
use url::Url;

use taskmaster_core::{
    config_file, session_file, DEFAULT_DEVELOPMENT_URL, DEFAULT_NOTICE_TIMEOUT_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

use crate::error::{ClientError, ClientResult};

pub const ENV_ENVIRONMENT: &str = "TASKMASTER_ENV";
pub const ENV_API_URL: &str = "TASKMASTER_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "TASKMASTER_TIMEOUT_SECS";
pub const ENV_SESSION_PATH: &str = "TASKMASTER_SESSION_PATH";

/// Runtime environment, selects which API base URL is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl FromStr for Environment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ClientError::config(format!("Unknown environment: {}", other))),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Which API the client talks to
    pub environment: Environment,

    /// API base URL in development
    pub development_url: String,

    /// API base URL in production; has no default
    pub production_url: Option<String>,

    /// Timeout applied to every request
    pub request_timeout_secs: u64,

    /// How long success notices stay visible
    pub notice_timeout_ms: u64,

    /// Where the session is persisted
    pub session_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            development_url: DEFAULT_DEVELOPMENT_URL.to_string(),
            production_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            notice_timeout_ms: DEFAULT_NOTICE_TIMEOUT_MS,
            session_path: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the default location, then apply environment
    /// overrides. Not validated, so callers can apply their own overrides
    /// before calling [`ClientConfig::validate`].
    pub async fn load() -> ClientResult<Self> {
        let config = Self::load_from(&config_file()).await?;
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load configuration from a file; a missing file yields the defaults
    pub async fn load_from(path: &Path) -> ClientResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ClientError::config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ClientError::config(format!("Invalid config format: {}", e)))
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> ClientResult<()> {
        self.save_to(&config_file()).await
    }

    pub async fn save_to(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .await
            .map_err(|e| ClientError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Apply `TASKMASTER_*` overrides. `lookup` is `std::env::var` outside of tests.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup(ENV_ENVIRONMENT) {
            self.environment = env.parse()?;
        }

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.set_api_url(url);
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs.trim().parse().map_err(|_| {
                ClientError::config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
        }

        if let Some(path) = lookup(ENV_SESSION_PATH).filter(|p| !p.trim().is_empty()) {
            self.session_path = Some(PathBuf::from(path));
        }

        Ok(self)
    }

    /// Override the base URL of the active environment
    pub fn set_api_url(&mut self, url: impl Into<String>) {
        match self.environment {
            Environment::Development => self.development_url = url.into(),
            Environment::Production => self.production_url = Some(url.into()),
        }
    }

    /// Base URL for the active environment, without a trailing slash
    pub fn api_url(&self) -> ClientResult<String> {
        let raw = match self.environment {
            Environment::Development => Some(self.development_url.as_str()),
            Environment::Production => self.production_url.as_deref(),
        }
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            ClientError::config(format!(
                "No API URL configured for {:?}; set {}",
                self.environment, ENV_API_URL
            ))
        })?;

        let parsed = Url::parse(raw)
            .map_err(|e| ClientError::config(format!("Invalid API URL '{}': {}", raw, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::config("API URL must use http or https"));
        }

        Ok(raw.trim_end_matches('/').to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notice_timeout(&self) -> Duration {
        Duration::from_millis(self.notice_timeout_ms)
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_path.clone().unwrap_or_else(session_file)
    }

    /// Validate configuration
    pub fn validate(&self) -> ClientResult<()> {
        self.api_url()?;
        if self.request_timeout_secs == 0 {
            return Err(ClientError::config("Request timeout must be greater than zero"));
        }
        Ok(())
    }
}

/// Configuration builder
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
    api_url: Option<String>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    /// Base URL for whichever environment is selected at build time
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn notice_timeout(mut self, timeout: Duration) -> Self {
        self.config.notice_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.session_path = Some(path.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(mut self) -> ClientResult<ClientConfig> {
        if let Some(url) = self.api_url.take() {
            self.config.set_api_url(url);
        }
        self.config.validate()?;
        Ok(self.config)
    }
}
