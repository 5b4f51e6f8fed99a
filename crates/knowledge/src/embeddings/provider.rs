//! Embedding provider trait and factory.

use crate::embeddings::config::EmbeddingConfig;
use crate::embeddings::providers::{OllamaProvider, TrigramProvider};
use crate::types::CollectionInfo;
use grounded_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "ollama", "trigram")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts, in order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// `provider/model` string recorded on a collection at build time.
pub fn model_identity(provider: &dyn EmbeddingProvider) -> String {
    format!("{}/{}", provider.provider_name(), provider.model_name())
}

/// Check that `provider` embeds into the same space `info` was built with.
pub fn ensure_compatible(provider: &dyn EmbeddingProvider, info: &CollectionInfo) -> AppResult<()> {
    let identity = model_identity(provider);

    if info.embedding_model != identity {
        return Err(AppError::Config(format!(
            "Collection '{}' was built with embedding model '{}' but the configured model is '{}'. Re-run ingestion or change the embedding settings.",
            info.name, info.embedding_model, identity
        )));
    }

    if info.dimensions != provider.dimensions() {
        return Err(AppError::Config(format!(
            "Collection '{}' stores {}-dimensional vectors but the embedder produces {}",
            info.name,
            info.dimensions,
            provider.dimensions()
        )));
    }

    Ok(())
}

/// Create an embedding provider based on configuration.
pub fn create_provider(config: &EmbeddingConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    if config.dimensions == 0 {
        return Err(AppError::Config(
            "Embedding dimensions must be greater than zero".to_string(),
        ));
    }

    tracing::debug!(
        "Creating embedding provider: provider={}, model={}, dimensions={}",
        config.provider,
        config.model,
        config.dimensions
    );

    match config.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaProvider::new(config)?)),

        "trigram" => Ok(Arc::new(TrigramProvider::new(config.dimensions))),

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: ollama, trigram",
            config.provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn info(embedding_model: &str, dimensions: usize) -> CollectionInfo {
        CollectionInfo {
            name: "my_docs".to_string(),
            dimensions,
            embedding_model: embedding_model.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_trigram_provider() {
        let provider = create_provider(&EmbeddingConfig::trigram(128)).unwrap();
        assert_eq!(provider.provider_name(), "trigram");
        assert_eq!(provider.model_name(), "trigram-v1");
        assert_eq!(provider.dimensions(), 128);
        assert_eq!(model_identity(provider.as_ref()), "trigram/trigram-v1");
    }

    #[test]
    fn test_create_ollama_provider() {
        let provider = create_provider(&EmbeddingConfig::default()).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "all-minilm");
        assert_eq!(provider.dimensions(), 384);
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = EmbeddingConfig {
            provider: "unknown".to_string(),
            ..EmbeddingConfig::default()
        };

        let err = create_provider(&config).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("Unknown embedding provider"));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = create_provider(&EmbeddingConfig::trigram(0)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_ensure_compatible() {
        let provider = TrigramProvider::new(64);

        assert!(ensure_compatible(&provider, &info("trigram/trigram-v1", 64)).is_ok());

        let err = ensure_compatible(&provider, &info("ollama/all-minilm", 64)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = ensure_compatible(&provider, &info("trigram/trigram-v1", 384)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_provider_embed_single() {
        let provider = create_provider(&EmbeddingConfig::trigram(384)).unwrap();

        let embedding = provider.embed("test text").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }
}
