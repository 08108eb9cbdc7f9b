//! Web Search and Content Extraction
//!
//! The pipeline needs two operations from a search backend: find a few
//! pages for a query, and pull the readable text out of one page. Both sit
//! behind the [`SearchProvider`] trait.
//!
//! # Backends
//!
//! - [`tavily`](crate::search::tavily) - Tavily search/extract REST API (needs an API key)
//! - [`duckduckgo`](crate::search::duckduckgo) - DuckDuckGo via `daedra` (keyless, `duckduckgo` feature)
//!
//! Queries are restricted to official government domains by appending
//! `site:` operators, see [`restrict_to_domains`].

/// Tavily REST client.
pub mod tavily;

/// DuckDuckGo search and page fetching via daedra.
#[cfg(feature = "duckduckgo")]
pub mod duckduckgo;

use crate::types::{AppError, Result, SearchHit};
use crate::utils::toml_config::{SearchBackend, SearchConfig};
use async_trait::async_trait;
use std::sync::Arc;

/// A web search backend with per-page content extraction
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search the web, returning at most `max_results` hits in rank order
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    /// Extract the raw text content of a page.
    ///
    /// `Ok(None)` means the page was reachable but yielded no usable content.
    async fn extract(&self, url: &str) -> Result<Option<String>>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Append `site:` operators so results come only from `domains`.
pub fn restrict_to_domains(query: &str, domains: &[String]) -> String {
    if domains.is_empty() {
        return query.to_string();
    }

    let sites = domains
        .iter()
        .map(|d| format!("site:{}", d))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!("{} {}", query, sites)
}

/// Build the configured search backend
pub fn build_search_provider(config: &SearchConfig) -> Result<Arc<dyn SearchProvider>> {
    match config.provider {
        SearchBackend::Tavily => {
            let api_key = config.api_key().ok_or_else(|| {
                AppError::Config(format!(
                    "Environment variable '{}' must hold the Tavily API key",
                    config.api_key_env
                ))
            })?;
            Ok(Arc::new(tavily::TavilySearch::new(
                config.base_url.clone(),
                api_key,
            )?))
        }

        #[cfg(feature = "duckduckgo")]
        SearchBackend::DuckDuckGo => Ok(Arc::new(duckduckgo::DuckDuckGoSearch::new())),

        #[cfg(not(feature = "duckduckgo"))]
        SearchBackend::DuckDuckGo => Err(AppError::Config(
            "DuckDuckGo search is not compiled in; rebuild with --features duckduckgo".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restrict_to_domains() {
        let domains = vec![
            "planalto.gov.br".to_string(),
            "sefaz.mt.gov.br".to_string(),
            "gov.br".to_string(),
        ];

        assert_eq!(
            restrict_to_domains("DFD Lei 14.133", &domains),
            "DFD Lei 14.133 site:planalto.gov.br OR site:sefaz.mt.gov.br OR site:gov.br"
        );
    }

    #[test]
    fn test_restrict_to_no_domains() {
        assert_eq!(restrict_to_domains("ETP", &[]), "ETP");
    }

    #[test]
    fn test_tavily_requires_key() {
        let config = SearchConfig {
            provider: SearchBackend::Tavily,
            api_key_env: "LICITA_TEST_UNSET_TAVILY_KEY".to_string(),
            ..SearchConfig::default()
        };

        assert!(matches!(
            build_search_provider(&config),
            Err(AppError::Config(_))
        ));
    }
}
