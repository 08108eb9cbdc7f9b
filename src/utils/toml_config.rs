//! TOML-based configuration for Licita
//!
//! This module provides declarative configuration for the server, LLM
//! providers and models, the search backend and the analysis pipeline via a
//! TOML file (`licita.toml`).
//!
//! # Hot Reloading
//!
//! Pipeline tunables (`[search]` limits and domains, `[pipeline]` timeout) are
//! read from the live configuration on every run, so edits apply without a
//! restart. Client handles (providers, models, search backend) are built once
//! at startup.

use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Root configuration structure loaded from licita.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicitaConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Named LLM provider configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Named model configurations that reference providers
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for LicitaConfig {
    fn default() -> Self {
        let mut providers = HashMap::new();
        providers.insert(
            "ollama-local".to_string(),
            ProviderConfig::Ollama {
                base_url: default_ollama_url(),
            },
        );

        let mut models = HashMap::new();
        models.insert(
            "general".to_string(),
            ModelConfig {
                provider: "ollama-local".to_string(),
                model: "llama3.1:8b".to_string(),
            },
        );
        models.insert(
            "reasoning".to_string(),
            ModelConfig {
                provider: "ollama-local".to_string(),
                model: "deepseek-r1:8b".to_string(),
            },
        );

        Self {
            server: ServerConfig::default(),
            providers,
            models,
            search: SearchConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty` or `json`
    #[serde(default)]
    pub log_format: LogFormat,

    /// Browser origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            cors_origins: default_cors_origins(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

// ============= Model Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Reference to a provider name defined in [providers]
    pub provider: String,

    /// Model name/identifier to use with the provider
    pub model: String,
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    #[value(name = "tavily")]
    Tavily,
    #[value(name = "duckduckgo")]
    DuckDuckGo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_backend")]
    pub provider: SearchBackend,

    /// Environment variable containing the Tavily API key
    #[serde(default = "default_tavily_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_tavily_url")]
    pub base_url: String,

    /// Hits fetched per generated query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Only these domains are searched
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
}

fn default_search_backend() -> SearchBackend {
    SearchBackend::Tavily
}

fn default_tavily_key_env() -> String {
    "TAVILY_API_KEY".to_string()
}

fn default_tavily_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_max_results() -> usize {
    2
}

fn default_allowed_domains() -> Vec<String> {
    vec![
        "planalto.gov.br".to_string(),
        "sefaz.mt.gov.br".to_string(),
        "gov.br".to_string(),
    ]
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: default_search_backend(),
            api_key_env: default_tavily_key_env(),
            base_url: default_tavily_url(),
            max_results: default_max_results(),
            allowed_domains: default_allowed_domains(),
        }
    }
}

impl SearchConfig {
    /// Resolve the API key from the environment
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
    }
}

// ============= Pipeline Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Model used for query generation and summarization
    #[serde(default = "default_general_model")]
    pub general_model: String,

    /// Model used for the final synthesis
    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,

    /// Per-branch deadline in seconds; 0 disables it
    #[serde(default = "default_branch_timeout")]
    pub branch_timeout_secs: u64,
}

fn default_general_model() -> String {
    "general".to_string()
}

fn default_reasoning_model() -> String {
    "reasoning".to_string()
}

fn default_branch_timeout() -> u64 {
    120
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            general_model: default_general_model(),
            reasoning_model: default_reasoning_model(),
            branch_timeout_secs: default_branch_timeout(),
        }
    }
}

impl PipelineConfig {
    pub fn branch_timeout(&self) -> Option<Duration> {
        (self.branch_timeout_secs > 0).then(|| Duration::from_secs(self.branch_timeout_secs))
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Provider '{0}' referenced by model '{1}' does not exist")]
    MissingProvider(String, String),

    #[error("Model '{0}' required by the pipeline is not defined in [models]")]
    MissingModel(String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl LicitaConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: LicitaConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate model -> provider references
        for (model_name, model_config) in &self.models {
            if !self.providers.contains_key(&model_config.provider) {
                return Err(ConfigError::MissingProvider(
                    model_config.provider.clone(),
                    model_name.clone(),
                ));
            }
        }

        for required in [&self.pipeline.general_model, &self.pipeline.reasoning_model] {
            if !self.models.contains_key(required) {
                return Err(ConfigError::MissingModel(required.clone()));
            }
        }

        for (name, provider) in &self.providers {
            match provider {
                ProviderConfig::Ollama { base_url } => {
                    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                        return Err(ConfigError::ValidationError(format!(
                            "Ollama base_url must start with http:// or https:// (provider: {})",
                            name
                        )));
                    }
                }
            }
        }

        if self.search.provider == SearchBackend::Tavily && self.search.api_key().is_none() {
            return Err(ConfigError::MissingEnvVar(self.search.api_key_env.clone()));
        }

        if self.search.max_results == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_results must be at least 1".to_string(),
            ));
        }

        if self.search.allowed_domains.is_empty() {
            return Err(ConfigError::ValidationError(
                "search.allowed_domains must list at least one domain".to_string(),
            ));
        }

        Ok(())
    }

    /// Get provider by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    /// Get model by name
    pub fn get_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
#[derive(Debug)]
pub struct LicitaConfigManager {
    config: Arc<ArcSwap<LicitaConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
}

impl LicitaConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = LicitaConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
        })
    }

    /// Create a config manager directly from a config (useful for testing).
    /// This won't have file watching capabilities.
    pub fn from_config(config: LicitaConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("licita.toml"),
            watcher: RwLock::new(None),
        }
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<LicitaConfig> {
        self.config.load_full()
    }

    /// Path the configuration was loaded from
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = LicitaConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes
    pub fn start_watching(&self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);
        let file_name = config_path.file_name().map(|n| n.to_os_string());

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_config && (event.kind.is_modify() || event.kind.is_create()) {
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // Watch the parent directory so editors that replace the file are seen
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        tokio::spawn(async move {
            let mut last_reload: Option<std::time::Instant> = None;
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                if last_reload.is_some_and(|t| t.elapsed() < debounce_duration) {
                    continue;
                }

                // Let the writer finish
                tokio::time::sleep(Duration::from_millis(100)).await;

                match LicitaConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = Some(std::time::Instant::now());
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }
}
