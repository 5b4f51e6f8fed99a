//! Ask command handler.
//!
//! Answers a question from the indexed documents and shows the fragments
//! the answer was grounded on.

use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use grounded_knowledge::{Answer, KnowledgeBase};

/// Characters of each fragment shown under the answer.
const FRAGMENT_PREVIEW_CHARS: usize = 300;

/// Ask a question answered only from the indexed documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Number of nearest chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Cosine distance cutoff for relevant chunks
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    ///
    /// A blank question is answered with the not-found sentinel, like any
    /// question with no relevant fragments.
    pub async fn execute(&self, config: &AppConfig, kb: &KnowledgeBase) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = top_k;
        }
        if let Some(threshold) = self.threshold {
            config.retrieval.threshold = threshold;
        }
        config.validate()?;

        let pipeline = grounded_knowledge::answer_pipeline(kb, &config)?;
        let answer = pipeline.answer(&self.question).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        } else {
            print!("{}", render_answer(&answer));
        }

        Ok(())
    }
}

/// Human-readable rendering: the answer, then each fragment numbered from 1.
fn render_answer(answer: &Answer) -> String {
    let mut out = String::new();

    out.push_str("Respuesta generada:\n");
    if answer.is_not_found() {
        out.push_str(&format!("  (sin resultados) {}\n", answer.text));
    } else {
        out.push_str(&format!("{}\n", answer.text));
    }

    if !answer.chunks.is_empty() {
        out.push_str("\nFragmentos recuperados:\n");
        for (i, chunk) in answer.chunks.iter().enumerate() {
            out.push_str(&format!("#{}\n{}\n\n", i + 1, fragment_preview(chunk)));
        }
    }

    out
}

/// First characters of a fragment, with an ellipsis only when cut.
fn fragment_preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(FRAGMENT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grounded_knowledge::embeddings::providers::TrigramProvider;
    use grounded_knowledge::index::SqliteIndex;
    use grounded_llm::ReplyKind;
    use std::sync::Arc;

    #[test]
    fn test_fragment_preview_short_text_unchanged() {
        assert_eq!(fragment_preview("París es la capital."), "París es la capital.");
    }

    #[test]
    fn test_fragment_preview_exact_length_has_no_ellipsis() {
        let text = "ñ".repeat(FRAGMENT_PREVIEW_CHARS);
        assert_eq!(fragment_preview(&text), text);
    }

    #[test]
    fn test_fragment_preview_truncates_on_chars() {
        let text = "é".repeat(FRAGMENT_PREVIEW_CHARS + 5);
        let preview = fragment_preview(&text);
        assert!(preview.ends_with('…'));
        assert_eq!(preview.chars().count(), FRAGMENT_PREVIEW_CHARS + 1);
    }

    #[test]
    fn test_render_not_found_has_no_fragments() {
        let rendered = render_answer(&Answer::not_found());
        assert!(rendered.contains("Respuesta generada:"));
        assert!(rendered.contains("(sin resultados)"));
        assert!(!rendered.contains("Fragmentos recuperados"));
    }

    #[test]
    fn test_render_numbers_fragments_in_order() {
        let answer = Answer::generated(
            "París".to_string(),
            vec!["primero".to_string(), "segundo".to_string()],
            ReplyKind::Completion,
        );
        let rendered = render_answer(&answer);

        assert!(rendered.starts_with("Respuesta generada:\nParís\n"));
        let first = rendered.find("#1\nprimero").unwrap();
        let second = rendered.find("#2\nsegundo").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_blank_question_answers_not_found() {
        let kb = KnowledgeBase::new(
            Arc::new(TrigramProvider::new(64)),
            Box::new(SqliteIndex::open_in_memory().unwrap()),
            "my_docs",
        );
        let command = AskCommand {
            question: "   ".to_string(),
            top_k: None,
            threshold: None,
            json: true,
        };

        command.execute(&AppConfig::default(), &kb).await.unwrap();
    }
}
