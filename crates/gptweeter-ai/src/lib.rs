//! Text and image generation engine for GPTweeter.
//!
//! Provides:
//! - Chat sessions that keep a transcript inside a token budget
//! - OpenAI-compatible (OpenAI, Groq) and Anthropic chat clients
//! - A fixed-delay retry policy around completion calls
//! - Image generation against synchronous and job-based providers
//! - A bounded LRU cache for generated avatar images

pub mod claude;
pub mod engine;
mod http;
pub mod image;
pub mod models;
pub mod openai;
pub mod providers;
pub mod retry;
pub mod session;
pub mod token_tracker;
pub mod tokens;

use async_trait::async_trait;
use gptweeter_common::{ConfigError, GptweeterError};

pub use claude::{ClaudeClient, ClaudeConfig};
pub use engine::ChatEngine;
pub use image::{
    AsyncImageBackend, CacheKey, ImageCache, ImageClient, ImageJob, ImageOutput, ImageRequest,
    JobStatus, PollPolicy, ResponseFormat, SyncImageBackend,
};
pub use models::ModelRegistry;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use providers::ChatProvider;
pub use retry::RetryPolicy;
pub use session::{SendOptions, Session};
pub use token_tracker::TokenTracker;
pub use tokens::TokenCounter;

/// Anything that can turn a transcript into the next assistant turn.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<AiResponse, AiError>;
}

/// One turn of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Optional knobs forwarded to the provider with a completion request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("transient failure after {attempts} attempts: {source}")]
    TransientFailure {
        attempts: u32,
        #[source]
        source: Box<AiError>,
    },
    #[error("image job {job_id} still pending after {polls} polls")]
    ImageGenerationTimeout { job_id: String, polls: u32 },
    #[error("image job {job_id} failed: {diagnostic}")]
    ImageGenerationFailed { job_id: String, diagnostic: String },
    #[error("malformed provider response: {0}")]
    MalformedProviderResponse(String),
}

impl AiError {
    /// Whether a completion call that failed this way is worth repeating.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AiError::ApiError(_)
                | AiError::RateLimited
                | AiError::NetworkError(_)
                | AiError::ParseError(_)
                | AiError::Timeout
        )
    }
}

impl From<ConfigError> for AiError {
    fn from(err: ConfigError) -> Self {
        AiError::Configuration(err.to_string())
    }
}

impl From<AiError> for GptweeterError {
    fn from(err: AiError) -> Self {
        GptweeterError::Ai(err.to_string())
    }
}
