//! # Licita - Analisador de Licitações
//!
//! A question-answering server for public procurement law (Lei Federal
//! 14.133/2021 and Decreto Estadual 1.525/2022 of Mato Grosso). Each question
//! runs through a four-stage pipeline:
//!
//! 1. A general-purpose model turns the question into search queries
//! 2. One concurrent branch per query searches official domains, extracts each
//!    page and summarizes it against the query
//! 3. A barrier waits for every branch and numbers the results `[1]..[N]`
//! 4. A reasoning model writes the cited answer, which is split into
//!    thinking process, analysis and references
//!
//! ## Overview
//!
//! Licita can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `licita-server` binary
//! 2. **As a library** - Embed the [`AnalysisPipeline`] in your own project
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use licita::{AnalysisPipeline, LicitaConfigManager, ModelHandles};
//! use licita::search::build_search_provider;
//! use std::sync::Arc;
//!
//! let manager = Arc::new(LicitaConfigManager::new("licita.toml")?);
//! let config = manager.config();
//!
//! let models = ModelHandles::from_config(&config)?;
//! let search = build_search_provider(&config.search)?;
//! let pipeline = AnalysisPipeline::new(models, search, manager);
//!
//! let response = pipeline.analyze("Quais são as modalidades de licitação?").await?;
//! println!("{}", response.analysis);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `duckduckgo` | DuckDuckGo search backend, no API key (default) |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui/` |
//!
//! ## Modules
//!
//! - [`api`] - REST and SSE handlers and routes
//! - [`llm`] - LLM client trait and the Ollama client
//! - [`research`] - The analysis pipeline, prompts and response parsing
//! - [`search`] - Web search and content extraction backends
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - TOML configuration with hot reload

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Query generation, concurrent search branches and synthesis.
pub mod research;
/// Search and extraction backends (Tavily, DuckDuckGo).
pub mod search;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

use std::sync::Arc;

// Re-export commonly used types
pub use llm::{LLMClient, ModelHandles, Provider};
pub use research::coordinator::AnalysisPipeline;
pub use search::SearchProvider;
pub use types::{AppError, Result};
pub use utils::toml_config::{LicitaConfig, LicitaConfigManager};

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Live configuration (hot-reloaded)
    pub config_manager: Arc<LicitaConfigManager>,
    /// The analysis pipeline shared by all requests
    pub pipeline: Arc<AnalysisPipeline>,
}
