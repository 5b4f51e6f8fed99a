//! Grounded prompt builder.

use crate::template::{GROUNDED_ANSWER_TEMPLATE, NOT_FOUND_ANSWER};
use grounded_core::{AppError, AppResult};
use handlebars::Handlebars;

/// Separator placed between retrieved chunks (a blank line).
pub const CONTEXT_SEPARATOR: &str = "\n\n";

const TEMPLATE_NAME: &str = "grounded_answer";

/// Join retrieved chunks, in rank order, into a single context block.
pub fn join_context<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.as_ref())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Build the grounding prompt for `query` over `context_chunks`.
///
/// The prompt instructs the generator to:
/// 1. answer only from the joined context,
/// 2. reply with exactly [`NOT_FOUND_ANSWER`] when the context lacks the answer,
/// 3. never use outside knowledge.
///
/// The output is a pure function of its inputs.
///
/// # Example
/// ```
/// use grounded_prompt::build_prompt;
///
/// let prompt = build_prompt(&["Paris is the capital of France."], "Capital of France?").unwrap();
/// assert!(prompt.contains("Paris is the capital of France."));
/// ```
pub fn build_prompt<S: AsRef<str>>(context_chunks: &[S], query: &str) -> AppResult<String> {
    let context = join_context(context_chunks);

    tracing::debug!(
        "Building grounded prompt from {} chunks ({} bytes of context)",
        context_chunks.len(),
        context.len()
    );

    let mut handlebars = Handlebars::new();

    // Plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string(TEMPLATE_NAME, GROUNDED_ANSWER_TEMPLATE)
        .map_err(|e| AppError::Other(format!("Failed to register prompt template: {}", e)))?;

    let data = serde_json::json!({
        "sentinel": NOT_FOUND_ANSWER,
        "context": context,
        "query": query,
    });

    handlebars
        .render(TEMPLATE_NAME, &data)
        .map_err(|e| AppError::Other(format!("Failed to render prompt template: {}", e)))
}
