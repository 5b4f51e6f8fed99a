//! Configuration management for grounded.
//!
//! Configuration is merged from several sources, lowest precedence first:
//! - Built-in defaults
//! - Config file (`.grounded/config.yaml` in the workspace, or `--config`)
//! - Environment variables
//! - Command-line flags
//!
//! Relative paths (corpus folder, index file) resolve against the workspace.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Embedding providers understood by the knowledge crate.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["ollama", "trigram"];

/// Generation backends understood by the llm crate.
pub const KNOWN_GENERATOR_PROVIDERS: [&str; 1] = ["ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .grounded/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Text-generation backend
    pub generator: GeneratorSettings,

    /// Embedding model used by both ingestion and retrieval
    pub embedding: EmbeddingSettings,

    /// Nearest-neighbour query parameters
    pub retrieval: RetrievalSettings,

    /// Corpus location and chunking policy
    pub ingestion: IngestionSettings,

    /// Vector index storage
    pub index: IndexSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON
    pub log_json: bool,
}

/// Text-generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorSettings {
    /// Backend provider name
    pub provider: String,

    /// Base URL of the generation API
    pub endpoint: String,

    /// Model identifier passed to the backend
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.1:8b".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Embedding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingSettings {
    /// Provider name: "ollama" or "trigram"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Base URL for HTTP providers
    pub endpoint: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "all-minilm".to_string(),
            dimensions: 384,
            endpoint: "http://localhost:11434".to_string(),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalSettings {
    /// Number of nearest chunks to request
    pub top_k: usize,

    /// Cosine distance cutoff; only chunks strictly below it are kept
    pub threshold: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            threshold: 0.7,
        }
    }
}

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestionSettings {
    /// Folder holding the .pdf/.txt corpus
    pub corpus: PathBuf,

    /// Window size in words
    pub chunk_size: usize,

    /// Words shared by consecutive windows
    pub chunk_overlap: usize,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            corpus: PathBuf::from("docs"),
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexSettings {
    /// SQLite database file
    pub path: PathBuf,

    /// Collection rebuilt by each ingestion run
    pub collection: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vectorstore").join("index.sqlite"),
            collection: "my_docs".to_string(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    generator: Option<GeneratorSection>,
    embedding: Option<EmbeddingSection>,
    retrieval: Option<RetrievalSection>,
    ingestion: Option<IngestionSection>,
    index: Option<IndexSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratorSection {
    provider: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalSection {
    top_k: Option<usize>,
    threshold: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestionSection {
    corpus: Option<PathBuf>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexSection {
    path: Option<PathBuf>,
    collection: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

/// Command-line overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub workspace: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub model: Option<String>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            generator: GeneratorSettings::default(),
            embedding: EmbeddingSettings::default(),
            retrieval: RetrievalSettings::default(),
            ingestion: IngestionSettings::default(),
            index: IndexSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and the environment.
    ///
    /// Environment variables:
    /// - `GROUNDED_WORKSPACE`: Override workspace path
    /// - `GROUNDED_CONFIG`: Path to config file
    /// - `GROUNDED_PROVIDER`: Generation backend
    /// - `GROUNDED_MODEL`: Generation model
    /// - `GROUNDED_ENDPOINT`: Generation endpoint
    /// - `GROUNDED_EMBEDDING_PROVIDER`: Embedding provider
    /// - `GROUNDED_EMBEDDING_MODEL`: Embedding model
    /// - `OLLAMA_URL`: Embedding endpoint
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use grounded_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None, None).expect("Failed to load config");
    /// println!("Corpus: {:?}", config.corpus_dir());
    /// ```
    pub fn load(workspace: Option<&Path>, config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace {
            config.workspace = workspace.to_path_buf();
        } else if let Ok(workspace) = std::env::var("GROUNDED_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Some(config_file) = config_file {
            config.config_file = Some(config_file.to_path_buf());
        } else if let Ok(config_file) = std::env::var("GROUNDED_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.grounded_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("GROUNDED_PROVIDER") {
            config.generator.provider = provider;
        }
        if let Ok(model) = std::env::var("GROUNDED_MODEL") {
            config.generator.model = model;
        }
        if let Ok(endpoint) = std::env::var("GROUNDED_ENDPOINT") {
            config.generator.endpoint = endpoint;
        }
        if let Ok(provider) = std::env::var("GROUNDED_EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }
        if let Ok(model) = std::env::var("GROUNDED_EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            config.embedding.endpoint = url;
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }
        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        Ok(self.clone().merge_file(file))
    }

    fn merge_file(mut self, file: ConfigFile) -> Self {
        if let Some(generator) = file.generator {
            if let Some(provider) = generator.provider {
                self.generator.provider = provider;
            }
            if let Some(endpoint) = generator.endpoint {
                self.generator.endpoint = endpoint;
            }
            if let Some(model) = generator.model {
                self.generator.model = model;
            }
            if let Some(timeout) = generator.timeout_secs {
                self.generator.timeout_secs = timeout;
            }
        }

        if let Some(embedding) = file.embedding {
            if let Some(provider) = embedding.provider {
                self.embedding.provider = provider;
            }
            if let Some(model) = embedding.model {
                self.embedding.model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                self.embedding.dimensions = dimensions;
            }
            if let Some(endpoint) = embedding.endpoint {
                self.embedding.endpoint = endpoint;
            }
        }

        if let Some(retrieval) = file.retrieval {
            if let Some(top_k) = retrieval.top_k {
                self.retrieval.top_k = top_k;
            }
            if let Some(threshold) = retrieval.threshold {
                self.retrieval.threshold = threshold;
            }
        }

        if let Some(ingestion) = file.ingestion {
            if let Some(corpus) = ingestion.corpus {
                self.ingestion.corpus = corpus;
            }
            if let Some(size) = ingestion.chunk_size {
                self.ingestion.chunk_size = size;
            }
            if let Some(overlap) = ingestion.chunk_overlap {
                self.ingestion.chunk_overlap = overlap;
            }
        }

        if let Some(index) = file.index {
            if let Some(path) = index.path {
                self.index.path = path;
            }
            if let Some(collection) = index.collection {
                self.index.collection = collection;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
            if let Some(json) = logging.json {
                self.log_json = json;
            }
        }

        self
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over both the config file and the environment.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(workspace) = overrides.workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = overrides.config_file {
            self.config_file = Some(config_file);
        }

        if let Some(model) = overrides.model {
            self.generator.model = model;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        if overrides.log_json {
            self.log_json = true;
        }

        self
    }

    /// Get the path to the .grounded directory.
    pub fn grounded_dir(&self) -> PathBuf {
        self.workspace.join(".grounded")
    }

    /// Corpus folder, resolved against the workspace.
    pub fn corpus_dir(&self) -> PathBuf {
        self.resolve(&self.ingestion.corpus)
    }

    /// Vector index file, resolved against the workspace.
    pub fn index_path(&self) -> PathBuf {
        self.resolve(&self.index.path)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// Validate configuration before any pipeline is built.
    pub fn validate(&self) -> AppResult<()> {
        let generator = self.generator.provider.as_str();
        if !KNOWN_GENERATOR_PROVIDERS.contains(&generator) {
            return Err(AppError::Config(format!(
                "Unknown generator provider: {}. Supported: {}",
                generator,
                KNOWN_GENERATOR_PROVIDERS.join(", ")
            )));
        }

        let provider = self.embedding.provider.as_str();
        if !KNOWN_EMBEDDING_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config(
                "top_k must be greater than zero".to_string(),
            ));
        }

        // Cosine distance lies in [0, 2]
        let threshold = self.retrieval.threshold;
        if !(threshold > 0.0 && threshold <= 2.0) {
            return Err(AppError::Config(format!(
                "Distance threshold must be in (0, 2], got {}",
                threshold
            )));
        }

        if self.ingestion.chunk_size == 0 {
            return Err(AppError::Config(
                "chunk_size must be greater than zero".to_string(),
            ));
        }

        if self.ingestion.chunk_overlap >= self.ingestion.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.ingestion.chunk_overlap, self.ingestion.chunk_size
            )));
        }

        if self.generator.timeout_secs == 0 {
            return Err(AppError::Config(
                "Generator timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
