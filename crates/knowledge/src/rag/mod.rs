//! Answer pipeline: retrieval, grounding prompt, generation.

pub mod answer;
pub mod types;

pub use answer::AnswerPipeline;
pub use types::{Answer, AnswerOutcome};
