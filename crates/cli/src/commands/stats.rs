//! Stats command handler.
//!
//! Shows what the vector index currently holds.

use clap::Args;
use grounded_core::AppResult;
use grounded_knowledge::KnowledgeBase;

/// Show index statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, kb: &KnowledgeBase) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let stats = kb.stats().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        match stats {
            Some(stats) => {
                println!("Collection: {}", stats.info.name);
                println!("Entries: {}", stats.entries);
                println!("Dimensions: {}", stats.info.dimensions);
                println!("Embedding model: {}", stats.info.embedding_model);
                println!("Built: {}", stats.info.created_at.to_rfc3339());
            }
            None => {
                println!(
                    "Collection '{}' is empty. Run `grounded ingest` to build it.",
                    kb.collection()
                );
            }
        }

        Ok(())
    }
}
