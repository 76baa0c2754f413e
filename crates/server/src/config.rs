use std::path::Path;
use std::time::Duration;

use engine::{SearchConfig, TaskSettings};
use oracle::{OpenAiConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "tot-server.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSection {
    pub base_url: String,
    pub model: String,
    /// Falls back to `OPENAI_API_KEY` when empty
    pub api_key: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub system_prompt: String,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            base_url: oracle::client::DEFAULT_BASE_URL.to_string(),
            model: oracle::client::DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            max_retries: 3,
            initial_backoff_ms: 1000,
            system_prompt: oracle::client::DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl OracleSection {
    pub fn client_config(&self) -> OpenAiConfig {
        let mut config = OpenAiConfig::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry(RetryPolicy {
                max_retries: self.max_retries,
                initial_backoff: Duration::from_millis(self.initial_backoff_ms),
                ..RetryPolicy::default()
            });
        config.system_prompt = self.system_prompt.clone();
        config
    }
}

/// Service configuration, read from TOML. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub oracle: OracleSection,
    pub search: SearchConfig,
    pub tasks: TaskSettings,
}

impl AppConfig {
    /// Read `path` if given and present, then apply environment overrides.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read(path).await?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    async fn read(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Apply `OPENAI_API_KEY`, `TOT_ORACLE_BASE_URL`, `TOT_ORACLE_MODEL` and
    /// `TOT_PORT` as reported by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if self.oracle.api_key.is_empty() {
            if let Some(key) = non_empty("OPENAI_API_KEY") {
                self.oracle.api_key = key;
            }
        }
        if let Some(url) = non_empty("TOT_ORACLE_BASE_URL") {
            self.oracle.base_url = url;
        }
        if let Some(model) = non_empty("TOT_ORACLE_MODEL") {
            self.oracle.model = model;
        }
        if let Some(port) = non_empty("TOT_PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "TOT_PORT",
                value: port.clone(),
            })?;
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
