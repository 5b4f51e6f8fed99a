//! Answer types.

use grounded_llm::ReplyKind;
use grounded_prompt::NOT_FOUND_ANSWER;
use serde::{Deserialize, Serialize};

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reply")]
pub enum AnswerOutcome {
    /// Nothing passed the retrieval threshold; the generator was not called.
    NotFound,

    /// The generator was called; carries which reply shape it returned.
    Generated(ReplyKind),
}

/// Result of answering one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Generated text, or the grounding sentinel
    pub text: String,

    /// Retrieved chunk texts in rank order
    pub chunks: Vec<String>,

    pub outcome: AnswerOutcome,
}

impl Answer {
    /// The "nothing relevant retrieved" answer.
    pub fn not_found() -> Self {
        Self {
            text: NOT_FOUND_ANSWER.to_string(),
            chunks: Vec::new(),
            outcome: AnswerOutcome::NotFound,
        }
    }

    pub fn generated(text: String, chunks: Vec<String>, kind: ReplyKind) -> Self {
        Self {
            text,
            chunks,
            outcome: AnswerOutcome::Generated(kind),
        }
    }

    /// Whether the answer text is the grounding sentinel, either because
    /// retrieval came back empty or because the model declined.
    pub fn is_not_found(&self) -> bool {
        self.text == NOT_FOUND_ANSWER
    }

    /// Whether the generator replied without a usable text field.
    pub fn is_fallback(&self) -> bool {
        self.outcome == AnswerOutcome::Generated(ReplyKind::Fallback)
    }

    /// `(answer_text, ordered_chunks)` for presentation.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.text, self.chunks)
    }
}
