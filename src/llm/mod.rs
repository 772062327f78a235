//! # Completion Service
//!
//! The hosted language model that turns a conversation history into the next
//! assistant reply. The conversation engine only sees the [`CompletionService`]
//! trait; [`OpenAiClient`] is the HTTP implementation used in production.
//!
//! ```text
//! ConversationHistory → CompletionService::complete → raw reply text
//! ```

pub mod send;
pub mod types;

pub use send::OpenAiClient;
pub use types::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};

use crate::history::Turn;
use async_trait::async_trait;
use thiserror::Error;

/// Every way a completion request can fail. The engine folds all of them into
/// one user-facing message, but the variants stay distinct for logging.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to create HTTP client: {0}")]
    Setup(String),

    #[error("Connection error - unable to reach the completion API: {0}")]
    Network(String),

    #[error("Request timeout - the completion API took too long to respond")]
    Timeout,

    #[error("Authentication failed - check your API key")]
    Unauthorized,

    #[error("Rate limit exceeded - too many requests or quota exhausted")]
    RateLimited,

    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    Malformed(String),
}

/// Per-request generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_output_tokens: 600,
        }
    }
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Submit the full (already truncated) history, system turn included.
    async fn complete(
        &self,
        turns: &[Turn],
        options: &CompletionOptions,
    ) -> Result<String, RequestError>;
}
