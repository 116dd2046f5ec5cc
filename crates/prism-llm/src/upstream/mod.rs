//! Upstream chat-completion clients

pub mod openai;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::types::{ChatCompletionResponse, UpstreamParams};

pub use openai::OpenAiClient;

/// Client for the LLM provider behind the gateway
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// Human-readable client name
    fn name(&self) -> &str;

    /// Perform a non-streaming chat completion
    async fn create_chat_completion(&self, params: &UpstreamParams) -> Result<ChatCompletionResponse, LlmError>;
}
