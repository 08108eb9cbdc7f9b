//! Configuration utilities.

/// TOML configuration (`licita.toml`) with hot reload.
pub mod toml_config;
