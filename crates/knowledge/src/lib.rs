//! Knowledge base: corpus ingestion, vector retrieval and grounded answering.
//!
//! Local-first RAG over a folder of `.pdf`/`.txt` documents, stored in a
//! SQLite vector index and answered by an Ollama model.

pub mod base;
pub mod chunker;
pub mod embeddings;
pub mod index;
pub mod ingest;
pub mod parser;
pub mod rag;
pub mod retriever;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use base::{KnowledgeBase, SharedIndex};
pub use ingest::Ingestor;
pub use rag::{Answer, AnswerOutcome, AnswerPipeline};
pub use retriever::Retriever;
pub use types::{CollectionInfo, CollectionStats, IngestFailure, IngestReport};

use grounded_core::{AppConfig, AppResult};

/// Rebuild the configured collection from the configured corpus folder.
pub async fn ingest(kb: &KnowledgeBase, config: &AppConfig) -> AppResult<IngestReport> {
    let ingestor = Ingestor::new(
        kb.clone(),
        config.ingestion.chunk_size,
        config.ingestion.chunk_overlap,
    )?;

    ingestor.ingest(&config.corpus_dir()).await
}

/// Build the answer pipeline over `kb` with the configured generator.
pub fn answer_pipeline(kb: &KnowledgeBase, config: &AppConfig) -> AppResult<AnswerPipeline> {
    let generator = grounded_llm::create_client(&config.generator)?;
    let retriever = Retriever::from_settings(kb.clone(), &config.retrieval);

    Ok(AnswerPipeline::new(
        retriever,
        generator,
        config.generator.model.clone(),
    ))
}
