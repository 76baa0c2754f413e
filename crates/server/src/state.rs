use std::sync::Arc;

use anyhow::Context;
use engine::SearchService;
use oracle::{OpenAiClient, Oracle};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service: SearchService, config: AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }

    /// Build the OpenAI-backed service described by `config`.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        if config.oracle.api_key.is_empty() {
            tracing::warn!("No oracle API key configured; set OPENAI_API_KEY or oracle.api_key");
        }

        let client = OpenAiClient::new(config.oracle.client_config())
            .context("Failed to create oracle client")?;
        Self::with_oracle(Arc::new(client), config)
    }

    pub fn with_oracle(oracle: Arc<dyn Oracle>, config: AppConfig) -> anyhow::Result<Self> {
        let service = SearchService::new(oracle, config.search, config.tasks)
            .context("Invalid search configuration")?;
        Ok(Self::new(service, config))
    }
}
