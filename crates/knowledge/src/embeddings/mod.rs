//! Embedder capability: text to fixed-length vector.
//!
//! The same provider instance must serve ingestion and retrieval; a
//! collection records the [`model_identity`] it was built with so the
//! retriever can refuse to compare vectors from different embedding spaces.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, ensure_compatible, model_identity, EmbeddingProvider};
