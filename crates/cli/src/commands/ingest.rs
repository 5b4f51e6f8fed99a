//! Ingest command handler.
//!
//! Rebuilds the vector index from the corpus folder.

use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use grounded_knowledge::{IngestReport, KnowledgeBase};
use std::path::PathBuf;

/// Rebuild the index from a folder of .pdf/.txt documents
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Corpus folder (default: from config)
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Words per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Words shared by consecutive chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig, kb: &KnowledgeBase) -> AppResult<()> {
        tracing::info!("Executing ingest command");
        tracing::debug!("Ingest options: {:?}", self);

        let mut config = config.clone();
        if let Some(ref corpus) = self.corpus {
            config.ingestion.corpus = corpus.clone();
        }
        if let Some(size) = self.chunk_size {
            config.ingestion.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.ingestion.chunk_overlap = overlap;
        }
        config.validate()?;

        tracing::info!(
            "Ingesting {:?} into collection '{}'",
            config.corpus_dir(),
            kb.collection()
        );

        let report = grounded_knowledge::ingest(kb, &config).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }

        Ok(())
    }
}

fn print_report(report: &IngestReport) {
    println!("Collection: {}", report.collection);
    println!("Documents indexed: {}", report.documents_indexed);
    println!("Chunks indexed: {}", report.chunks_indexed);
    if report.replaced_previous {
        println!("Previous index replaced");
    }
    if report.skipped > 0 {
        println!("Skipped (unsupported or empty): {}", report.skipped);
    }
    if !report.failures.is_empty() {
        println!("Failed documents: {}", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.path.display(), failure.message);
        }
    }
    println!("Took {:.2}s", report.duration_secs);
}
