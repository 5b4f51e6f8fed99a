//! Trigram embedding provider for offline use.

use crate::embeddings::provider::EmbeddingProvider;
use grounded_core::AppResult;
use std::collections::{BTreeMap, HashSet};

/// Model name reported by [`TrigramProvider`].
pub const TRIGRAM_MODEL: &str = "trigram-v1";

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Words too common to carry meaning, in English and Spanish.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "were", "with", "from", "this", "that", "have", "has",
    "had", "its", "their", "they", "them", "which", "los", "las", "una", "uno", "del", "por",
    "para", "con", "que", "como", "sobre", "pero", "sus", "este", "esta", "son", "fue", "ser",
];

/// Deterministic hashing embedder.
///
/// Each content word adds weight to one bucket for the whole word and one
/// bucket per character trigram of the padded word, and the result is
/// L2-normalized. Texts sharing vocabulary land close together in cosine
/// distance. It has no semantic understanding; it exists so the pipeline can
/// run and be tested without a model server.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
    stop_words: HashSet<&'static str>,
}

impl TrigramProvider {
    /// Create a new trigram provider with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        let hash = token.bytes().fold(FNV_OFFSET, |acc, b| {
            (acc ^ u64::from(b)).wrapping_mul(FNV_PRIME)
        });
        (hash % self.dimensions as u64) as usize
    }

    fn content_words(&self, text: &str) -> BTreeMap<String, u32> {
        let mut frequencies = BTreeMap::new();

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .filter(|w| w.chars().count() > 2 && !self.stop_words.contains(w.as_str()))
        {
            *frequencies.entry(word).or_insert(0) += 1;
        }

        frequencies
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        for (word, freq) in self.content_words(text) {
            embedding[self.bucket(&word)] += freq as f32;

            let padded: Vec<char> = format!(" {} ", word).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                embedding[self.bucket(&trigram)] += (freq as f32).sqrt();
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        TRIGRAM_MODEL
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
