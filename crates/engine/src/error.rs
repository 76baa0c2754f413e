use events::EmitError;
use oracle::OracleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Oracle request failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Invalid run transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("Run cancelled: observer disconnected")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Message safe to show to the observer of a failed run.
    pub fn public_message(&self) -> String {
        match self {
            EngineError::Oracle(err) => err.public_message(),
            EngineError::InvalidConfig(_) => self.to_string(),
            EngineError::Cancelled => "Run cancelled".to_string(),
            EngineError::InvalidTransition { .. } | EngineError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<EmitError> for EngineError {
    fn from(err: EmitError) -> Self {
        match err {
            EmitError::Closed => EngineError::Cancelled,
            EmitError::AlreadyTerminated => EngineError::Internal(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
