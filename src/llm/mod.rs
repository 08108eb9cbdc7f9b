//! LLM Provider Clients and Abstractions
//!
//! This module hides provider-specific APIs behind the [`LLMClient`] trait so
//! the analysis pipeline can run against any backend (or a test double).
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`Provider`] - Resolved provider/model pair from `licita.toml`
//! - [`ModelHandles`] - The `general` and `reasoning` clients built at startup
//! - [`invoke_structured`] - Typed JSON output with strict validation
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `ollama` - Local Ollama server (default)
//!
//! # Example
//!
//! ```ignore
//! use licita::llm::{invoke_structured, ModelHandles};
//! use licita::types::QueryList;
//!
//! let models = ModelHandles::from_config(&config).await?;
//! let list: QueryList = invoke_structured(models.general.as_ref(), &prompt).await?;
//! ```

/// Core LLM client trait, provider resolution and structured output.
pub mod client;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{LLMClient, ModelHandles, Provider, invoke_structured};
