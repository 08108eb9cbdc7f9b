//! LLM Client abstractions and provider management
//!
//! The pipeline talks to two logical models through the same trait:
//! - a **general** model for query generation and result summarization
//! - a **reasoning** model for the final synthesis
//!
//! Both are built once at startup from `licita.toml` and shared as
//! `Arc<dyn LLMClient>` handles.

use crate::types::{AppError, Result};
use crate::utils::toml_config::{LicitaConfig, ProviderConfig};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a free-text completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate a completion constrained to JSON output.
    ///
    /// `schema` is the JSON schema the answer must follow. The raw JSON text
    /// is returned; validation against the target type happens in
    /// [`invoke_structured`].
    async fn generate_structured(&self, prompt: &str, schema: &serde_json::Value)
    -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Ask `client` for an object of type `T` and strictly deserialize it.
///
/// Transport failures surface as whatever the client returned; output that
/// does not match `T` becomes [`AppError::Generation`].
pub async fn invoke_structured<T>(client: &dyn LLMClient, prompt: &str) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = serde_json::to_value(schemars::schema_for!(T))
        .map_err(|e| AppError::Internal(format!("Failed to render schema: {}", e)))?;

    let raw = client.generate_structured(prompt, &schema).await?;

    parse_structured(&raw)
}

/// Parse a structured answer, tolerating surrounding whitespace only.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw.trim()).map_err(|e| {
        AppError::Generation(format!(
            "model output does not match the expected schema: {} (output: {:?})",
            e,
            truncate(raw, 200)
        ))
    })
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// Ollama local LLM provider
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.1:8b".to_string(),
    /// };
    /// ```
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Resolve a `[models.<name>]` entry into a provider
    pub fn from_config(config: &LicitaConfig, model_name: &str) -> Result<Self> {
        let model = config.get_model(model_name).ok_or_else(|| {
            AppError::Config(format!("Model '{}' is not configured", model_name))
        })?;

        let provider = config.get_provider(&model.provider).ok_or_else(|| {
            AppError::Config(format!(
                "Provider '{}' referenced by model '{}' does not exist",
                model.provider, model_name
            ))
        })?;

        match provider {
            ProviderConfig::Ollama { base_url } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.model.clone(),
            }),
        }
    }

    /// Create a client instance for this provider
    pub async fn create_client(&self) -> Result<Arc<dyn LLMClient>> {
        match self {
            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Arc::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone())?,
            )),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { model, .. } => Err(AppError::Config(format!(
                "Ollama support is not compiled in (requested model '{}'); rebuild with --features ollama",
                model
            ))),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Model identifier passed to the provider
    pub fn model(&self) -> &str {
        match self {
            Provider::Ollama { model, .. } => model,
        }
    }
}

/// The two model handles the pipeline needs
#[derive(Clone)]
pub struct ModelHandles {
    /// Query generation and summarization
    pub general: Arc<dyn LLMClient>,
    /// Final synthesis
    pub reasoning: Arc<dyn LLMClient>,
}

impl ModelHandles {
    /// Build both handles from the `general` and `reasoning` model entries
    pub async fn from_config(config: &LicitaConfig) -> Result<Self> {
        let general = Provider::from_config(config, &config.pipeline.general_model)?;
        let reasoning = Provider::from_config(config, &config.pipeline.reasoning_model)?;

        tracing::info!(
            general = %general.model(),
            reasoning = %reasoning.model(),
            provider = general.name(),
            "Creating LLM clients"
        );

        Ok(Self {
            general: general.create_client().await?,
            reasoning: reasoning.create_client().await?,
        })
    }
}
