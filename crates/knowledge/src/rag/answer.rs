//! Answer orchestration.
//!
//! Retrieves relevant chunks, stops early with the grounding sentinel when
//! there are none, and otherwise asks the generator to answer from them.

use crate::rag::types::Answer;
use crate::retriever::Retriever;
use grounded_core::AppResult;
use grounded_llm::{LlmClient, LlmRequest};
use grounded_prompt::build_prompt;
use std::sync::Arc;
use tracing::{info, instrument};

/// Answers one query at a time over a knowledge base.
#[derive(Clone)]
pub struct AnswerPipeline {
    retriever: Retriever,
    generator: Arc<dyn LlmClient>,
    model: String,
}

impl std::fmt::Debug for AnswerPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerPipeline")
            .field("retriever", &self.retriever)
            .field("generator", &self.generator.provider_name())
            .field("model", &self.model)
            .finish()
    }
}

impl AnswerPipeline {
    pub fn new(retriever: Retriever, generator: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            retriever,
            generator,
            model: model.into(),
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer `query` from the knowledge base.
    ///
    /// Generator transport failures are returned as errors, never turned
    /// into the sentinel.
    #[instrument(skip(self), fields(model = %self.model))]
    pub async fn answer(&self, query: &str) -> AppResult<Answer> {
        info!("Retrieving context");
        let chunks = self.retriever.retrieve(query).await?;

        if chunks.is_empty() {
            info!("No relevant chunks, answering not found without generation");
            return Ok(Answer::not_found());
        }

        let prompt = build_prompt(&chunks, query)?;

        info!("Generating answer from {} chunks", chunks.len());
        let response = self
            .generator
            .complete(&LlmRequest::new(prompt, self.model.clone()))
            .await?;

        info!(kind = ?response.kind, "Answer generated");

        Ok(Answer::generated(response.content, chunks, response.kind))
    }
}
