//! grounded CLI
//!
//! Main entry point for the grounded command-line tool: ingest a folder of
//! documents, then ask questions answered only from them.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, IngestCommand, StatsCommand};
use grounded_core::config::{AppConfig, ConfigOverrides};
use grounded_core::{logging, AppResult};
use grounded_knowledge::KnowledgeBase;
use std::path::PathBuf;

/// grounded - answer questions from your own documents with a local model
#[derive(Parser, Debug)]
#[command(name = "grounded")]
#[command(about = "Answer questions from your own documents with a local model", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "GROUNDED_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file (default: <workspace>/.grounded/config.yaml)
    #[arg(short, long, global = true, env = "GROUNDED_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "GROUNDED_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild the vector index from the corpus folder
    Ingest(IngestCommand),

    /// Ask a question answered only from the indexed documents
    Ask(AskCommand),

    /// Show index statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Defaults, config file and environment
    let config = AppConfig::load(cli.workspace.as_deref(), cli.config.as_deref())?;

    // Apply CLI overrides
    let config = config.with_overrides(ConfigOverrides {
        workspace: cli.workspace,
        config_file: cli.config,
        model: cli.model,
        log_level: cli.log_level,
        verbose: cli.verbose,
        no_color: cli.no_color,
        log_json: cli.log_json,
    });

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("grounded starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!(
        "Generator: {} ({}) at {}",
        config.generator.model,
        config.generator.provider,
        config.generator.endpoint
    );

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Ask(_) => "ask",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Embedder and index are opened once and shared by every component
    let result = match KnowledgeBase::from_config(&config) {
        Ok(kb) => match cli.command {
            Commands::Ingest(cmd) => cmd.execute(&config, &kb).await,
            Commands::Ask(cmd) => cmd.execute(&config, &kb).await,
            Commands::Stats(cmd) => cmd.execute(&kb).await,
        },
        Err(e) => Err(e),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
