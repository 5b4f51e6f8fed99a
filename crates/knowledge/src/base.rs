//! Shared knowledge base resources.

use crate::embeddings::{create_provider, model_identity, EmbeddingConfig, EmbeddingProvider};
use crate::index::SqliteIndex;
use crate::types::CollectionStats;
use crate::vector_index::VectorIndex;
use grounded_core::{AppConfig, AppResult};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Vector index shared between ingestion (writer) and retrieval (readers).
pub type SharedIndex = Arc<RwLock<Box<dyn VectorIndex>>>;

/// Embedder, vector index and collection name, constructed once at startup
/// and handed to the ingestor and the retriever.
///
/// Cloning is cheap and every clone refers to the same embedder and index.
/// The index lock serializes a rebuild against in-flight queries.
#[derive(Clone)]
pub struct KnowledgeBase {
    embedder: Arc<dyn EmbeddingProvider>,
    index: SharedIndex,
    collection: String,
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("embedder", &self.embedder)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl KnowledgeBase {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Box<dyn VectorIndex>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            index: Arc::new(RwLock::new(index)),
            collection: collection.into(),
        }
    }

    /// Open the configured SQLite index and embedding provider.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let embedder = create_provider(&EmbeddingConfig::from(&config.embedding))?;
        let index = SqliteIndex::open(&config.index_path())?;

        tracing::debug!(
            "Knowledge base ready: collection '{}' at {:?}, embedder {}",
            config.index.collection,
            config.index_path(),
            model_identity(embedder.as_ref())
        );

        Ok(Self::new(
            embedder,
            Box::new(index),
            config.index.collection.clone(),
        ))
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    pub fn index(&self) -> &SharedIndex {
        &self.index
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// `provider/model` of the embedder, as recorded on collections it builds.
    pub fn embedding_model(&self) -> String {
        model_identity(self.embedder.as_ref())
    }

    /// Statistics for the collection, or `None` if it has not been built.
    pub async fn stats(&self) -> AppResult<Option<CollectionStats>> {
        let index = self.index.read().await;

        let Some(info) = index.collection_info(&self.collection)? else {
            return Ok(None);
        };

        let entries = index.count(&self.collection)?;
        Ok(Some(CollectionStats { info, entries }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;
    use crate::types::IndexEntry;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stats_missing_collection() {
        let kb = KnowledgeBase::new(
            Arc::new(TrigramProvider::new(8)),
            Box::new(SqliteIndex::open_in_memory().unwrap()),
            "my_docs",
        );

        assert!(kb.stats().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_counts_entries() {
        let kb = KnowledgeBase::new(
            Arc::new(TrigramProvider::new(2)),
            Box::new(SqliteIndex::open_in_memory().unwrap()),
            "my_docs",
        );

        {
            let mut index = kb.index().write().await;
            index
                .create_collection("my_docs", 2, &kb.embedding_model())
                .unwrap();
            index
                .add("my_docs", IndexEntry::new("a", vec![1.0, 0.0], "alpha"))
                .unwrap();
        }

        let stats = kb.stats().await.unwrap().unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.info.embedding_model, "trigram/trigram-v1");
    }

    #[tokio::test]
    async fn test_from_config_opens_index_under_workspace() {
        let temp = TempDir::new().unwrap();
        let mut config = AppConfig {
            workspace: temp.path().to_path_buf(),
            ..AppConfig::default()
        };
        config.embedding.provider = "trigram".to_string();
        config.embedding.dimensions = 32;

        let kb = KnowledgeBase::from_config(&config).unwrap();
        assert_eq!(kb.collection(), "my_docs");
        assert_eq!(kb.embedder().dimensions(), 32);
        assert!(config.index_path().exists());
    }
}
