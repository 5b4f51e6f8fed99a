//! Error types for the grounded RAG pipeline.
//!
//! This module defines a unified error enum covering configuration,
//! document ingestion, embedding, vector index and generation failures.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the grounded workspace.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid configuration or parameters (e.g. chunk overlap >= chunk size).
    /// Fatal: the caller must fix the input before retrying.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single document could not be read or extracted.
    ///
    /// The ingestion pipeline contains these: the document is skipped and
    /// the run continues.
    #[error("Failed to ingest {path:?}: {message}")]
    Ingestion { path: PathBuf, message: String },

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index storage errors
    #[error("Index error: {0}")]
    Index(String),

    /// Text-generation backend errors (connection, non-2xx, non-JSON, timeout)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Build an ingestion error for a document path.
    pub fn ingestion(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        AppError::Ingestion {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from the text-generation backend.
    pub fn is_generation(&self) -> bool {
        matches!(self, AppError::Generation(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
