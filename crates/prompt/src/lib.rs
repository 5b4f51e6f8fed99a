//! Prompt construction for grounded answering.
//!
//! This crate owns the grounding contract shared by the retrieval and
//! generation paths:
//! - [`NOT_FOUND_ANSWER`], the exact refusal text
//! - [`build_prompt`], which instructs the generator to answer only from the
//!   retrieved context and to emit that refusal otherwise

pub mod builder;
pub mod template;

// Re-export main items
pub use builder::{build_prompt, join_context, CONTEXT_SEPARATOR};
pub use template::{GROUNDED_ANSWER_TEMPLATE, NOT_FOUND_ANSWER};
