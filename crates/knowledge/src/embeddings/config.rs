//! Embedding provider configuration.

use grounded_core::config::EmbeddingSettings;
use serde::{Deserialize, Serialize};

/// Default Ollama embedding model, the Ollama build of all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

/// Output length of [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Everything needed to construct an embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "ollama" or "trigram"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Base URL for HTTP providers
    pub endpoint: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::from(&EmbeddingSettings::default())
    }
}

impl From<&EmbeddingSettings> for EmbeddingConfig {
    fn from(settings: &EmbeddingSettings) -> Self {
        Self {
            provider: settings.provider.clone(),
            model: settings.model.clone(),
            dimensions: settings.dimensions,
            endpoint: settings.endpoint.clone(),
        }
    }
}

impl EmbeddingConfig {
    /// Offline trigram configuration with the given dimensions.
    pub fn trigram(dimensions: usize) -> Self {
        Self {
            provider: "trigram".to_string(),
            model: super::providers::trigram::TRIGRAM_MODEL.to_string(),
            dimensions,
            ..Self::default()
        }
    }
}
