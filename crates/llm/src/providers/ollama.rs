//! Ollama text-generation provider.
//!
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{LlmClient, LlmRequest, LlmResponse};
use crate::reply::GenerateReply;
use grounded_core::{AppError, AppResult};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const GENERATE_ENDPOINT: &str = "/api/generate";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Ollama `/api/generate` request body.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama LLM client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    /// Base URL for Ollama API
    base_url: String,

    /// Applied to the whole request, including reading the body
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OLLAMA_URL)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama client with a custom base URL and request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client,
        }
    }

    fn to_ollama_request<'a>(&self, request: &'a LlmRequest) -> OllamaRequest<'a> {
        OllamaRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Generation(format!(
                "Request to Ollama timed out after {}s",
                self.timeout.as_secs_f64()
            ))
        } else {
            AppError::Generation(format!("Failed to send request to Ollama: {}", err))
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %request.model, prompt_len = request.prompt.len()))]
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        info!("Sending generation request to Ollama");

        let url = format!("{}{}", self.base_url, GENERATE_ENDPOINT);

        let response = self
            .client
            .post(&url)
            .json(&self.to_ollama_request(request))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        debug!("Ollama status: {}", status);
        debug!("Ollama raw response: {}", body);

        if !status.is_success() {
            return Err(AppError::Generation(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            AppError::Generation(format!("Ollama returned a non-JSON body: {}", e))
        })?;

        let reply = GenerateReply::from_value(value);
        let kind = reply.kind();

        info!(?kind, "Received generation from Ollama");

        Ok(LlmResponse {
            content: reply.into_text(),
            model: request.model.clone(),
            kind,
        })
    }
}
