//! LLM client abstraction and request/response types.

use crate::reply::ReplyKind;
use grounded_core::AppResult;
use serde::{Deserialize, Serialize};

/// Non-streaming completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmRequest {
    /// The prompt text to send to the backend
    pub prompt: String,

    /// Model identifier (e.g., "llama3.1:8b")
    pub model: String,
}

impl LlmRequest {
    /// Create a new request.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
        }
    }
}

/// Completion response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmResponse {
    /// The generated text, or the "no response" fallback
    pub content: String,

    /// Model the request was sent to
    pub model: String,

    /// Which reply shape the backend produced
    pub kind: ReplyKind,
}

/// Trait for text-generation backends.
///
/// Transport failures (connection, non-2xx status, non-JSON body, timeout)
/// are returned as `AppError::Generation`. A well-formed reply that carries
/// no recognizable text field is *not* an error: it yields the
/// [`NO_RESPONSE_FALLBACK`](crate::reply::NO_RESPONSE_FALLBACK) text with
/// [`ReplyKind::Fallback`].
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "ollama").
    fn provider_name(&self) -> &str;

    /// Perform a single blocking completion.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;

    /// Send `prompt` to `model` and return the generated text.
    async fn generate(&self, prompt: &str, model: &str) -> AppResult<String> {
        let response = self.complete(&LlmRequest::new(prompt, model)).await?;
        Ok(response.content)
    }
}
