//! Test doubles for the embedder and the generator.

use crate::base::KnowledgeBase;
use crate::embeddings::EmbeddingProvider;
use crate::index::SqliteIndex;
use crate::types::IndexEntry;
use grounded_core::{AppError, AppResult};
use grounded_llm::{LlmClient, LlmRequest, LlmResponse, ReplyKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Embedder returning a fixed vector per known text.
#[derive(Debug)]
pub struct StubEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
    calls: AtomicUsize,
    fail_on: Mutex<Option<String>>,
}

impl StubEmbedder {
    /// Unknown texts embed to `fallback`.
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
            fail_on: Mutex::new(None),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.fallback.len());
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fail every batch holding a text that contains `marker`.
    pub fn fail_on(&self, marker: &str) {
        *self.fail_on.lock().unwrap() = Some(marker.to_string());
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for StubEmbedder {
    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "fixed"
    }

    fn dimensions(&self) -> usize {
        self.fallback.len()
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(texts.len(), Ordering::SeqCst);

        if let Some(marker) = self.fail_on.lock().unwrap().as_deref() {
            if texts.iter().any(|t| t.contains(marker)) {
                return Err(AppError::Embedding(
                    "Failed to connect to Ollama: connection refused".to_string(),
                ));
            }
        }

        Ok(texts
            .iter()
            .map(|t| self.vectors.get(t).unwrap_or(&self.fallback).clone())
            .collect())
    }
}

/// Generator that records every prompt and replies from a script.
pub struct CountingGenerator {
    reply: Option<(String, ReplyKind)>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl CountingGenerator {
    pub fn replying(text: &str, kind: ReplyKind) -> Self {
        Self {
            reply: Some((text.to_string(), kind)),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the backend were unreachable.
    pub fn unreachable() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for CountingGenerator {
    fn provider_name(&self) -> &str {
        "counting"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        match &self.reply {
            Some((text, kind)) => Ok(LlmResponse {
                content: text.clone(),
                model: request.model.clone(),
                kind: *kind,
            }),
            None => Err(AppError::Generation(
                "Failed to send request to Ollama: connection refused".to_string(),
            )),
        }
    }
}

/// In-memory knowledge base over `embedder`.
pub fn knowledge_base(embedder: Arc<dyn EmbeddingProvider>) -> KnowledgeBase {
    KnowledgeBase::new(
        embedder,
        Box::new(SqliteIndex::open_in_memory().unwrap()),
        "my_docs",
    )
}

/// Build the collection directly from `(id, vector, text)` triples.
pub async fn seed(kb: &KnowledgeBase, entries: Vec<(&str, Vec<f32>, &str)>) {
    let mut index = kb.index().write().await;
    index.clear_collection(kb.collection()).unwrap();
    index
        .create_collection(
            kb.collection(),
            kb.embedder().dimensions(),
            &kb.embedding_model(),
        )
        .unwrap();

    for (id, vector, text) in entries {
        index
            .add(kb.collection(), IndexEntry::new(id, vector, text))
            .unwrap();
    }
}

/// Unit vector at cosine distance `distance` from `[1, 0]`.
pub fn at_distance(distance: f32) -> Vec<f32> {
    let similarity = 1.0 - distance;
    vec![similarity, (1.0 - similarity * similarity).sqrt()]
}

/// Smallest PDF that holds one Helvetica text line per page. An empty
/// string yields a page with an empty content stream.
pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    for (i, text) in pages.iter().enumerate() {
        let content = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text)
        };
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_start = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        )
        .as_bytes(),
    );

    pdf
}
