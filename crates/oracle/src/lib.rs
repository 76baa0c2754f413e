//! Oracle client for the tree-of-thoughts search
//!
//! The oracle is a chat-completion model asked two kinds of questions:
//! "what are promising next steps from here?" and "how likely is this state
//! to reach the goal?". This crate only moves text; interpreting the answers
//! is the search engine's job.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;
pub mod types;

use async_trait::async_trait;

pub use client::{OpenAiClient, OpenAiConfig, RetryPolicy};
pub use error::{OracleError, OracleResult};
#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedOracle;
pub use types::{AskParams, ChatMessage, Role};

/// Something that answers free-text prompts.
///
/// Implementations own their timeouts and retries; a returned error means
/// the question could not be answered at all.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn ask(&self, prompt: &str, params: AskParams) -> OracleResult<String>;
}
