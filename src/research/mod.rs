//! Procurement Question Analysis
//!
//! This module answers a question about Lei 14.133/2021 and Decreto
//! 1.525/2022 by coordinating an LLM and a web search backend.
//!
//! # Architecture
//!
//! - [`coordinator::AnalysisPipeline`] - Runs the stages and owns the fan-out
//! - [`prompts`] - Prompt templates for each LLM stage
//! - [`postprocess`] - Splits the synthesis into reasoning, analysis and references
//!
//! # Usage
//!
//! ```ignore
//! use licita::research::coordinator::AnalysisPipeline;
//!
//! let pipeline = AnalysisPipeline::new(models, search, config_manager);
//!
//! let response = pipeline
//!     .analyze("Como elaborar um Documento de Formalização de Demanda (DFD)?")
//!     .await?;
//!
//! println!("{}\n\nReferências:\n{}", response.analysis, response.references);
//! ```
//!
//! # Analysis Workflow
//!
//! 1. **Query Generation** - The general model turns the question into 3-5 search queries
//! 2. **Search** - One concurrent branch per query searches official `gov.br` domains
//! 3. **Summarization** - Each extracted page is summarized by the general model
//! 4. **Synthesis** - The reasoning model writes the cited answer from all summaries
//! 5. **Citation** - A numbered references block is appended to the answer

/// Pipeline coordination, fan-out and evidence rendering.
pub mod coordinator;
/// Output splitting on reasoning and references markers.
pub mod postprocess;
/// Prompt templates.
pub mod prompts;
