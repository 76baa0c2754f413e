use std::time::Duration;

use thiserror::Error;

/// Failures of a single oracle interaction.
///
/// Malformed completion *content* is not an error here; callers degrade it.
/// These variants cover transport and protocol failures only.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Oracle rate limited, retry after {retry_after:?}s")]
    RateLimited { retry_after: Option<u64> },

    #[error("Oracle call timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl OracleError {
    /// Whether the client may retry the call that produced this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            OracleError::RateLimited { .. } => true,
            OracleError::Api {
                status_code: Some(code),
                ..
            } => *code >= 500,
            _ => false,
        }
    }
}

impl OracleError {
    /// Short description without upstream response text, fit for clients.
    pub fn public_message(&self) -> String {
        match self {
            OracleError::Api {
                status_code: Some(code),
                ..
            } => format!("Oracle request failed with status {}", code),
            OracleError::Api { status_code: None, .. } | OracleError::Http(_) => {
                "Oracle request failed".to_string()
            }
            OracleError::RateLimited { .. } => "Oracle rate limit exceeded".to_string(),
            OracleError::Timeout(_) => self.to_string(),
            OracleError::Serialization(_) => "Oracle response could not be read".to_string(),
            OracleError::InvalidConfig(_) => "Oracle client is misconfigured".to_string(),
        }
    }
}

/// Result type alias for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;
