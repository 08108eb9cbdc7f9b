//! Search backend using daedra
//!
//! daedra queries DuckDuckGo and converts fetched pages to markdown, so this
//! backend works without any API key.

use crate::search::SearchProvider;
use crate::types::{AppError, Result, SearchHit};
use async_trait::async_trait;

/// Web search backend powered by daedra
pub struct DuckDuckGoSearch;

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: max_results,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| AppError::Search(format!("DuckDuckGo search failed: {}", e)))?;

        Ok(response
            .data
            .iter()
            .take(max_results)
            .map(|r| SearchHit {
                title: r.title.clone(),
                url: r.url.clone(),
            })
            .collect())
    }

    async fn extract(&self, url: &str) -> Result<Option<String>> {
        let fetch_args = daedra::VisitPageArgs {
            url: url.to_string(),
            include_images: false,
            selector: None,
        };

        let page = daedra::tools::fetch::fetch_page(&fetch_args)
            .await
            .map_err(|e| AppError::Extraction(format!("Failed to fetch {}: {}", url, e)))?;

        if page.content.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(page.content))
        }
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}
