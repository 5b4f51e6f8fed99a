//! Generation client factory.
//!
//! Builds the configured backend once at process start; the returned handle
//! is shared by every answer pipeline.

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use grounded_core::config::GeneratorSettings;
use grounded_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create a generation client from generator settings.
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown.
pub fn create_client(settings: &GeneratorSettings) -> AppResult<Arc<dyn LlmClient>> {
    match settings.provider.to_lowercase().as_str() {
        "ollama" => {
            tracing::debug!(
                "Creating Ollama client at {} (timeout {}s)",
                settings.endpoint,
                settings.timeout_secs
            );
            let client = OllamaClient::with_timeout(
                settings.endpoint.as_str(),
                Duration::from_secs(settings.timeout_secs),
            );
            Ok(Arc::new(client))
        }
        other => Err(AppError::Config(format!(
            "Unknown generator provider: {}",
            other
        ))),
    }
}
