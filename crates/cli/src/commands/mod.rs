//! Command handlers for the grounded CLI.

pub mod ask;
pub mod ingest;
pub mod stats;

pub use ask::AskCommand;
pub use ingest::IngestCommand;
pub use stats::StatsCommand;
