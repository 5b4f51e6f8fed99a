//! Query-time retrieval: embed, nearest-neighbor search, distance threshold.

use crate::base::KnowledgeBase;
use crate::embeddings::ensure_compatible;
use crate::types::ScoredText;
use grounded_core::config::RetrievalSettings;
use grounded_core::{AppError, AppResult};

/// Default number of nearest neighbors to fetch.
pub const DEFAULT_TOP_K: usize = 3;

/// Default cosine distance cut-off; hits must be strictly below it.
pub const DEFAULT_THRESHOLD: f32 = 0.7;

const PREVIEW_CHARS: usize = 80;

/// Finds the chunks relevant to a query.
#[derive(Debug, Clone)]
pub struct Retriever {
    kb: KnowledgeBase,
    top_k: usize,
    threshold: f32,
}

impl Retriever {
    /// Create a retriever over `kb` with default `k` and threshold.
    pub fn new(kb: KnowledgeBase) -> Self {
        Self {
            kb,
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn from_settings(kb: KnowledgeBase, settings: &RetrievalSettings) -> Self {
        Self::new(kb)
            .with_top_k(settings.top_k)
            .with_threshold(settings.threshold)
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Texts of at most `k` chunks whose distance to `query` is below the
    /// threshold, most relevant first.
    ///
    /// An empty result means nothing relevant was found; it is not an error.
    pub async fn retrieve(&self, query: &str) -> AppResult<Vec<String>> {
        Ok(self
            .retrieve_scored(query)
            .await?
            .into_iter()
            .map(|hit| hit.text)
            .collect())
    }

    /// Like [`Retriever::retrieve`], keeping ids and distances.
    pub(crate) async fn retrieve_scored(&self, query: &str) -> AppResult<Vec<ScoredText>> {
        if query.trim().is_empty() {
            tracing::debug!("Blank query, nothing to retrieve");
            return Ok(Vec::new());
        }

        let embedder = self.kb.embedder();
        let collection = self.kb.collection();

        // Readers wait for an in-progress rebuild to finish
        let index = self.kb.index().read().await;

        let info = index.collection_info(collection)?.ok_or_else(|| {
            AppError::Index(format!(
                "Collection '{}' does not exist. Run `grounded ingest` first.",
                collection
            ))
        })?;
        ensure_compatible(embedder.as_ref(), &info)?;

        let query_vector = embedder.embed(query).await?;
        let candidates = index.query(collection, &query_vector, self.top_k)?;

        for candidate in &candidates {
            tracing::debug!(
                distance = candidate.distance,
                id = %candidate.id,
                "Candidate: {}",
                preview(&candidate.text)
            );
        }

        let total = candidates.len();
        let hits: Vec<ScoredText> = candidates
            .into_iter()
            .filter(|hit| hit.distance < self.threshold)
            .collect();

        tracing::info!(
            "Retrieved {} of {} candidates below distance {}",
            hits.len(),
            total,
            self.threshold
        );

        Ok(hits)
    }
}

/// First characters of a chunk, on one line, for log output.
fn preview(text: &str) -> String {
    text.chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}
