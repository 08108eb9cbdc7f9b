//! API request handlers.

/// Analysis handlers (blocking and streaming).
pub mod analysis;
/// Root, health and example-question handlers.
pub mod info;
