//! Corpus ingestion: full rebuild of a collection from a folder of documents.

use crate::base::KnowledgeBase;
use crate::chunker::{chunk_id, chunk_words, validate_params};
use crate::parser::extract_document;
use crate::types::{Document, IndexEntry, IngestFailure, IngestReport};
use crate::vector_index::VectorIndex;
use grounded_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Rebuilds the knowledge base collection from a corpus folder.
#[derive(Debug, Clone)]
pub struct Ingestor {
    kb: KnowledgeBase,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Ingestor {
    /// Create an ingestor; invalid chunking parameters are rejected here,
    /// before any index content is touched.
    pub fn new(kb: KnowledgeBase, chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        validate_params(chunk_size, chunk_overlap)?;

        Ok(Self {
            kb,
            chunk_size,
            chunk_overlap,
        })
    }

    /// Replace the collection with chunks of every `.pdf` and `.txt` file in
    /// `corpus`.
    ///
    /// Documents that fail to extract are logged, recorded in the report and
    /// skipped. Embedding or index failures abort the run.
    pub async fn ingest(&self, corpus: &Path) -> AppResult<IngestReport> {
        let start = Instant::now();

        if !corpus.is_dir() {
            return Err(AppError::Config(format!(
                "Corpus folder not found: {:?}",
                corpus
            )));
        }

        let collection = self.kb.collection();
        tracing::info!("Ingesting {:?} into collection '{}'", corpus, collection);

        let mut report = IngestReport {
            collection: collection.to_string(),
            ..IngestReport::default()
        };

        let files = list_corpus(corpus, &mut report);

        // Writers exclude every reader for the whole rebuild
        let mut index = self.kb.index().write().await;

        report.replaced_previous = index.clear_collection(collection)?;
        if report.replaced_previous {
            tracing::info!("Previous collection '{}' removed", collection);
        }

        // A failed rebuild leaves no collection rather than a partial one
        let outcome = self.rebuild(&mut **index, files, &mut report).await;
        if let Err(e) = outcome {
            tracing::error!("Ingestion of '{}' aborted: {}", collection, e);
            if let Err(clear_err) = index.clear_collection(collection) {
                tracing::warn!(
                    "Failed to drop partial collection '{}': {}",
                    collection,
                    clear_err
                );
            }
            return Err(e);
        }

        report.duration_secs = start.elapsed().as_secs_f64();

        tracing::info!(
            "Ingestion completed: {} chunks from {} documents ({} skipped, {} failed) in {:.2}s",
            report.chunks_indexed,
            report.documents_indexed,
            report.skipped,
            report.failures.len(),
            report.duration_secs
        );

        Ok(report)
    }

    /// Create the collection and fill it with every file in `files`.
    async fn rebuild(
        &self,
        index: &mut dyn VectorIndex,
        files: Vec<PathBuf>,
        report: &mut IngestReport,
    ) -> AppResult<()> {
        let embedder = self.kb.embedder();
        index.create_collection(
            self.kb.collection(),
            embedder.dimensions(),
            &self.kb.embedding_model(),
        )?;

        for path in files {
            let document = match extract_document(&path) {
                Ok(Some(document)) => document,
                Ok(None) => {
                    tracing::debug!("Skipping unsupported file {:?}", path);
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    report.failures.push(IngestFailure {
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if document.text.trim().is_empty() {
                tracing::debug!("Skipping {:?}: no extractable text", path);
                report.skipped += 1;
                continue;
            }

            let indexed = self.index_document(index, &document).await?;

            tracing::info!("{} -> {} chunks", document.id, indexed);

            if indexed > 0 {
                report.documents_indexed += 1;
                report.chunks_indexed += indexed;
            }
        }

        Ok(())
    }

    /// Chunk, embed and store one document. Returns the number of entries added.
    async fn index_document(
        &self,
        index: &mut dyn VectorIndex,
        document: &Document,
    ) -> AppResult<usize> {
        let chunks = chunk_words(&document.text, self.chunk_size, self.chunk_overlap)?;
        if chunks.is_empty() {
            return Ok(0);
        }

        let embeddings = self.kb.embedder().embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(AppError::Embedding(format!(
                "Embedder returned {} vectors for {} chunks of {}",
                embeddings.len(),
                chunks.len(),
                document.id
            )));
        }

        let collection = self.kb.collection();
        let mut added = 0;

        for (sequence, (text, vector)) in chunks.into_iter().zip(embeddings).enumerate() {
            index.add(
                collection,
                IndexEntry::new(chunk_id(&document.id, sequence), vector, text),
            )?;
            added += 1;
        }

        Ok(added)
    }
}

/// Regular files directly inside `corpus`, sorted by file name.
fn list_corpus(corpus: &Path, report: &mut IngestReport) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(corpus)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) if entry.path().is_file() => files.push(entry.into_path()),
            Ok(entry) => tracing::debug!("Ignoring non-file corpus entry {:?}", entry.path()),
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| corpus.to_path_buf());
                tracing::warn!("Cannot read corpus entry {:?}: {}", path, e);
                report.failures.push(IngestFailure {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::debug!("Found {} files in {:?}", files.len(), corpus);
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;
    use crate::index::SqliteIndex;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn knowledge_base() -> KnowledgeBase {
        KnowledgeBase::new(
            Arc::new(TrigramProvider::new(64)),
            Box::new(SqliteIndex::open_in_memory().unwrap()),
            "my_docs",
        )
    }

    #[test]
    fn test_invalid_chunking_rejected() {
        let err = Ingestor::new(knowledge_base(), 50, 50).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_corpus_is_config_error() {
        let temp = TempDir::new().unwrap();
        let ingestor = Ingestor::new(knowledge_base(), 500, 50).unwrap();

        let err = ingestor.ingest(&temp.path().join("missing")).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_chunk_ids_and_counts() {
        let temp = TempDir::new().unwrap();
        let words: Vec<String> = (0..12).map(|i| format!("palabra{}", i)).collect();
        fs::write(temp.path().join("notes.txt"), words.join(" ")).unwrap();

        let kb = knowledge_base();
        let ingestor = Ingestor::new(kb.clone(), 5, 1).unwrap();
        let report = ingestor.ingest(temp.path()).await.unwrap();

        // Windows start at 0, 4 and 8
        assert_eq!(report.chunks_indexed, 3);
        assert_eq!(report.documents_indexed, 1);

        let index = kb.index().read().await;
        let query = kb.embedder().embed("palabra8 palabra9 palabra10 palabra11").await.unwrap();
        let hits = index.query("my_docs", &query, 3).unwrap();
        let mut ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["notes.txt_chunk_0", "notes.txt_chunk_1", "notes.txt_chunk_2"]);
    }

    #[tokio::test]
    async fn test_subdirectories_are_not_descended() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("deep.txt"), "hidden words here").unwrap();
        fs::write(temp.path().join("top.txt"), "visible words here").unwrap();

        let ingestor = Ingestor::new(knowledge_base(), 500, 50).unwrap();
        let report = ingestor.ingest(temp.path()).await.unwrap();

        assert_eq!(report.documents_indexed, 1);
        assert_eq!(report.chunks_indexed, 1);
    }
}
