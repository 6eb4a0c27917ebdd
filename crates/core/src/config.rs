//! Configuration management for Nurture.
//!
//! Configuration is layered, lowest precedence first:
//! - Built-in defaults
//! - Config file (`.nurture/config.yaml` in the workspace)
//! - Environment variables
//! - Command-line flags
//!
//! Corpus paths are resolved relative to the workspace.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Default question used when a request arrives without text.
pub const DEFAULT_QUESTION: &str = "What are the signs of pregnancy?";

/// Upper bound on passages retrieved per query.
pub const MAX_TOP_K: usize = 5;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .nurture/ and the corpora)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Console log format
    pub log_format: LogFormat,

    /// Optional log file
    pub log_file: Option<PathBuf>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    pub corpus: CorpusSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub pipeline: PipelineSettings,
}

/// Locations of the two read-only corpora.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CorpusSettings {
    /// Knowledge passages (JSON array of `{title, content, source?}`)
    pub resources: PathBuf,

    /// Emotion-tagged utterances (JSON array of `{tags, utterance}`)
    pub utterances: PathBuf,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            resources: PathBuf::from("structured_maternal_guide.json"),
            utterances: PathBuf::from("empathetic_responses.json"),
        }
    }
}

/// Generative model settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmSettings {
    /// Provider name ("openai" or "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom endpoint base URL
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Override for the assistant persona sent as the system message
    pub system_prompt: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            endpoint: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            system_prompt: None,
        }
    }
}

/// Embedding service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingSettings {
    /// Provider name ("openai" or "trigram")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Custom endpoint base URL
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-ada-002".to_string(),
            dimensions: 1536,
            endpoint: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Vector index service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexSettings {
    /// Provider name ("pinecone" or "memory")
    pub provider: String,

    /// Index name
    pub name: String,

    /// Data-plane host of the index (required for pinecone)
    pub host: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Number of nearest neighbors requested per query
    pub top_k: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            provider: "pinecone".to_string(),
            name: "maternal-knowledge".to_string(),
            host: None,
            api_key_env: "PINECONE_API_KEY".to_string(),
            top_k: MAX_TOP_K,
        }
    }
}

/// Per-request pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineSettings {
    /// Deadline spanning retrieval through generation
    pub timeout_secs: u64,

    /// Question substituted when a request carries no text
    pub default_question: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            default_question: DEFAULT_QUESTION.to_string(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    corpus: Option<CorpusSettings>,
    llm: Option<LlmSettings>,
    embedding: Option<EmbeddingSettings>,
    index: Option<IndexSettings>,
    pipeline: Option<PipelineSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    format: Option<LogFormat>,
    file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            log_level: None,
            log_format: LogFormat::Text,
            log_file: None,
            verbose: false,
            no_color: false,
            corpus: CorpusSettings::default(),
            llm: LlmSettings::default(),
            embedding: EmbeddingSettings::default(),
            index: IndexSettings::default(),
            pipeline: PipelineSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and environment variables.
    ///
    /// Environment variables:
    /// - `NURTURE_WORKSPACE`: Override workspace path
    /// - `NURTURE_CONFIG`: Path to config file
    /// - `NURTURE_PROVIDER`: LLM provider
    /// - `NURTURE_MODEL`: Model identifier
    /// - `NURTURE_INDEX_HOST`: Vector index host
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use nurture_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("NURTURE_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("NURTURE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.nurture_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("NURTURE_PROVIDER") {
            config.llm.provider = provider;
        }

        if let Ok(model) = std::env::var("NURTURE_MODEL") {
            config.llm.model = model;
        }

        if let Ok(host) = std::env::var("NURTURE_INDEX_HOST") {
            config.index.host = Some(host);
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

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        Ok(self.clone().merge(config_file))
    }

    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(path) = file.workspace.and_then(|ws| ws.path) {
            self.workspace = PathBuf::from(path);
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
            if let Some(format) = logging.format {
                self.log_format = format;
            }
            if let Some(log_file) = logging.file {
                self.log_file = Some(log_file);
            }
        }

        if let Some(corpus) = file.corpus {
            self.corpus = corpus;
        }
        if let Some(llm) = file.llm {
            self.llm = llm;
        }
        if let Some(embedding) = file.embedding {
            self.embedding = embedding;
        }
        if let Some(index) = file.index {
            self.index = index;
        }
        if let Some(pipeline) = file.pipeline {
            self.pipeline = pipeline;
        }

        self
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        log_format: Option<LogFormat>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.llm.provider = provider;
        }

        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if let Some(log_format) = log_format {
            self.log_format = log_format;
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .nurture directory.
    pub fn nurture_dir(&self) -> PathBuf {
        self.workspace.join(".nurture")
    }

    /// Absolute path of the resource corpus.
    pub fn resource_corpus_path(&self) -> PathBuf {
        self.workspace.join(&self.corpus.resources)
    }

    /// Absolute path of the utterance corpus.
    pub fn utterance_corpus_path(&self) -> PathBuf {
        self.workspace.join(&self.corpus.utterances)
    }

    /// Read an API key from the named environment variable.
    pub fn resolve_api_key(&self, env_var: &str) -> Option<String> {
        std::env::var(env_var).ok().filter(|key| !key.trim().is_empty())
    }

    /// Validate provider names and provider-specific requirements.
    ///
    /// API keys are not checked here; the pipeline builder reports a
    /// missing key for the provider that needs it.
    pub fn validate(&self) -> AppResult<()> {
        const LLM_PROVIDERS: [&str; 2] = ["openai", "ollama"];
        const EMBEDDING_PROVIDERS: [&str; 2] = ["openai", "trigram"];
        const INDEX_PROVIDERS: [&str; 2] = ["pinecone", "memory"];

        check_known("LLM provider", &self.llm.provider, &LLM_PROVIDERS)?;
        check_known(
            "embedding provider",
            &self.embedding.provider,
            &EMBEDDING_PROVIDERS,
        )?;
        check_known("index provider", &self.index.provider, &INDEX_PROVIDERS)?;

        if self.index.provider == "pinecone" && self.index.host.is_none() {
            return Err(AppError::Config(format!(
                "Index '{}' requires a host (set index.host or NURTURE_INDEX_HOST)",
                self.index.name
            )));
        }

        if self.index.top_k == 0 || self.index.top_k > MAX_TOP_K {
            return Err(AppError::Config(format!(
                "index.topK must be between 1 and {}, got {}",
                MAX_TOP_K, self.index.top_k
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding.dimensions must be at least 1".to_string(),
            ));
        }

        if self.pipeline.timeout_secs == 0 {
            return Err(AppError::Config(
                "pipeline.timeoutSecs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_known(what: &str, value: &str, known: &[&str]) -> AppResult<()> {
    if known.contains(&value) {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "Unknown {}: {}. Supported: {}",
            what,
            value,
            known.join(", ")
        )))
    }
}
