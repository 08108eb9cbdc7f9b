//! Tavily search client
//!
//! Talks to the `/search` and `/extract` endpoints of the Tavily REST API.

use crate::search::SearchProvider;
use crate::types::{AppError, Result, SearchHit};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct TavilySearch {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResultItem>,
}

#[derive(Debug, Deserialize)]
struct SearchResultItem {
    #[serde(default)]
    title: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    urls: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    results: Vec<ExtractResultItem>,
}

#[derive(Debug, Deserialize)]
struct ExtractResultItem {
    #[serde(default)]
    raw_content: Option<String>,
}

impl TavilySearch {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> std::result::Result<R, reqwest::Error>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        self.http
            .post(format!("{}/{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json::<R>()
            .await
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let request = SearchRequest {
            query,
            max_results,
            include_raw_content: false,
        };

        let response: SearchResponse = self
            .post("search", &request)
            .await
            .map_err(|e| AppError::Search(format!("Tavily search failed: {}", e)))?;

        Ok(response
            .results
            .into_iter()
            .take(max_results)
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
            })
            .collect())
    }

    async fn extract(&self, url: &str) -> Result<Option<String>> {
        let request = ExtractRequest { urls: [url] };

        let response: ExtractResponse = self
            .post("extract", &request)
            .await
            .map_err(|e| AppError::Extraction(format!("Tavily extract failed for {}: {}", url, e)))?;

        Ok(response
            .results
            .into_iter()
            .next()
            .and_then(|r| r.raw_content)
            .filter(|content| !content.trim().is_empty()))
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
