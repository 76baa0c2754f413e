use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::error::{OracleError, OracleResult};
use crate::types::*;
use crate::Oracle;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a precise math reasoning assistant.";

const DEFAULT_MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;
const MAX_BACKOFF_MS: u64 = 60000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_ERROR_BODY_CHARS: usize = 200;

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Backoff schedule for rate-limited and server-error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(MAX_BACKOFF_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
    /// Upper bound for one HTTP exchange, retries excluded
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Client for OpenAI-compatible chat completion APIs
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> OracleResult<Self> {
        if config.model.trim().is_empty() {
            return Err(OracleError::InvalidConfig("model must not be empty".into()));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    async fn with_retry<T, F, Fut>(&self, operation: F, operation_name: &str) -> OracleResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = OracleResult<T>>,
    {
        let policy = self.config.retry;
        let mut retries = 0;
        let mut backoff = policy.initial_backoff;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() => {
                    if retries >= policy.max_retries {
                        error!(
                            "{} failed after {} retries: {}",
                            operation_name, retries, e
                        );
                        return Err(e);
                    }

                    let wait = match &e {
                        OracleError::RateLimited {
                            retry_after: Some(secs),
                        } => Duration::from_secs(*secs),
                        _ => backoff,
                    }
                    .min(policy.max_backoff);

                    warn!(
                        "{} failed ({}), retrying in {}ms (attempt {}/{})",
                        operation_name,
                        e,
                        wait.as_millis(),
                        retries + 1,
                        policy.max_retries
                    );

                    tokio::time::sleep(wait).await;
                    retries += 1;
                    backoff = (backoff * 2).min(policy.max_backoff);
                }
                Err(e) => {
                    if retries > 0 {
                        info!("{} failed after {} retries: {}", operation_name, retries, e);
                    }
                    return Err(e);
                }
            }
        }
    }

    pub async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        params: AskParams,
    ) -> OracleResult<String> {
        self.with_retry(
            || async { self.chat_completion_inner(messages.clone(), params).await },
            "chat_completion",
        )
        .await
    }

    async fn chat_completion_inner(
        &self,
        messages: Vec<ChatMessage>,
        params: AskParams,
    ) -> OracleResult<String> {
        debug!(
            "Creating chat completion with {} messages, model {}",
            messages.len(),
            self.config.model
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: Some(params.temperature),
            max_tokens: Some(params.max_tokens),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok());
                warn!("Rate limited by oracle API");
                return Err(OracleError::RateLimited { retry_after });
            }

            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_resp) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                error!(
                    "Oracle API error: {} (type: {:?})",
                    error_resp.error.message, error_resp.error.error_type
                );
                return Err(OracleError::Api {
                    message: truncate(&error_resp.error.message, MAX_ERROR_BODY_CHARS),
                    status_code: Some(status.as_u16()),
                });
            }

            return Err(OracleError::Api {
                message: truncate(&error_text, MAX_ERROR_BODY_CHARS),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_response: ChatCompletionResponse =
            response.json().await.map_err(|e| self.classify(e))?;

        let choice = chat_response.choices.into_iter().next();
        let content = choice
            .as_ref()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();
        if content.is_empty() {
            warn!(
                finish_reason = ?choice.as_ref().and_then(|c| c.finish_reason.as_deref()),
                "Oracle returned no completion text"
            );
        }
        Ok(content.to_string())
    }

    fn classify(&self, err: reqwest::Error) -> OracleError {
        if err.is_timeout() {
            OracleError::Timeout(self.config.timeout)
        } else {
            OracleError::Http(err)
        }
    }
}

#[async_trait]
impl Oracle for OpenAiClient {
    async fn ask(&self, prompt: &str, params: AskParams) -> OracleResult<String> {
        let messages = vec![
            ChatMessage::system(self.config.system_prompt.clone()),
            ChatMessage::user(prompt),
        ];
        self.chat_completion(messages, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = OpenAiConfig::new("test-key").with_base_url("http://localhost:9999/v1/");
        let client = OpenAiClient::new(config).unwrap();
        assert_eq!(client.config.api_key, "test-key");
        assert_eq!(client.config.base_url, "http://localhost:9999/v1");
        assert_eq!(client.config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_empty_model_rejected() {
        let config = OpenAiConfig::new("k").with_model("  ");
        assert!(matches!(
            OpenAiClient::new(config),
            Err(OracleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_backoff, Duration::from_secs(1));
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }
}
