//! Knowledge system type definitions.

use crate::parser::ContentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named unit of raw text read from the corpus.
///
/// Documents only live for the duration of an ingestion run; what persists is
/// the chunks derived from them.
#[derive(Debug, Clone)]
pub struct Document {
    /// File name, used as the prefix of every chunk id
    pub id: String,

    /// Full path the text was extracted from
    pub path: PathBuf,

    pub content_type: ContentType,

    /// Extracted text
    pub text: String,
}

/// Persisted `(id, vector, text)` triple, handed to the index by value.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
}

impl IndexEntry {
    pub fn new(id: impl Into<String>, vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vector,
            text: text.into(),
        }
    }
}

/// A nearest-neighbor hit: stored text plus its cosine distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredText {
    pub id: String,
    pub text: String,
    pub distance: f32,
}

/// Metadata recorded for a collection when it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,

    /// Vector length every entry must have
    pub dimensions: usize,

    /// `provider/model` of the embedder the collection was built with
    pub embedding_model: String,

    pub created_at: DateTime<Utc>,
}

/// Collection statistics for `stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    #[serde(flatten)]
    pub info: CollectionInfo,

    pub entries: usize,
}

/// A document that could not be read during ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Summary of an ingestion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// Collection that was rebuilt
    pub collection: String,

    /// Documents that contributed at least one chunk
    pub documents_indexed: usize,

    /// Total chunks written to the index
    pub chunks_indexed: usize,

    /// Files ignored because of their extension, or documents with no text
    pub skipped: usize,

    /// Documents that failed to extract
    pub failures: Vec<IngestFailure>,

    /// Whether a previous build of the collection was removed
    pub replaced_previous: bool,

    pub duration_secs: f64,
}
