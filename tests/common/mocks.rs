//! Mock implementations for testing.
//!
//! Scripted LLM clients and search backends shared by the pipeline and API
//! tests. Every mock records its calls so tests can assert on fan-out.

use async_trait::async_trait;
use licita::llm::LLMClient;
use licita::search::SearchProvider;
use licita::types::{AppError, Result, SearchHit};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock LLM client with a fixed structured answer and a fixed free-text answer.
///
/// # Examples
///
/// ```ignore
/// // General model: three queries, every summary is "resumo"
/// let general = MockLLMClient::new(r#"{"queries": ["a", "b", "c"]}"#, "resumo");
///
/// // Reasoning model whose generate call fails
/// let reasoning = MockLLMClient::failing();
/// ```
pub struct MockLLMClient {
    structured: String,
    response: String,
    should_fail: bool,
    prompts: Mutex<Vec<String>>,
    generate_calls: AtomicUsize,
}

impl MockLLMClient {
    /// Create a client answering `structured` to JSON requests and `response` otherwise.
    pub fn new(structured: &str, response: &str) -> Self {
        Self {
            structured: structured.to_string(),
            response: response.to_string(),
            should_fail: false,
            prompts: Mutex::new(Vec::new()),
            generate_calls: AtomicUsize::new(0),
        }
    }

    /// Create a client for the synthesis role, which never gets JSON requests.
    pub fn text(response: &str) -> Self {
        Self::new("{}", response)
    }

    /// Create a mock client whose free-text generation always fails.
    ///
    /// Structured requests still answer `structured`.
    pub fn failing_generate(structured: &str) -> Self {
        Self {
            should_fail: true,
            ..Self::new(structured, "")
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self::failing_generate("")
    }

    /// Number of free-text generation calls
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// Every prompt received, in arrival order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());

        if self.should_fail && self.structured.is_empty() {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.structured.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Mock search backend returning `hits_per_query` hits for every query.
pub struct MockSearchProvider {
    hits_per_query: usize,
    content: Option<String>,
    fail_search: bool,
    delay: Option<Duration>,
    extract_delay: Option<(usize, Duration)>,
    queries: Mutex<Vec<String>>,
    search_calls: AtomicUsize,
    extract_calls: AtomicUsize,
}

impl MockSearchProvider {
    /// Every extraction returns `content`
    pub fn new(hits_per_query: usize, content: &str) -> Self {
        Self {
            hits_per_query,
            content: Some(content.to_string()),
            fail_search: false,
            delay: None,
            extract_delay: None,
            queries: Mutex::new(Vec::new()),
            search_calls: AtomicUsize::new(0),
            extract_calls: AtomicUsize::new(0),
        }
    }

    /// Hits are found but no page yields content
    pub fn empty_extraction(hits_per_query: usize) -> Self {
        Self {
            content: None,
            ..Self::new(hits_per_query, "")
        }
    }

    /// Every search call fails
    pub fn failing() -> Self {
        Self {
            fail_search: true,
            ..Self::new(0, "")
        }
    }

    /// Every search call sleeps for `delay` first
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(1, "conteúdo")
        }
    }

    /// The first `completed` extractions answer at once, later ones sleep for `delay`
    pub fn slow_extraction_after(hits_per_query: usize, completed: usize, delay: Duration) -> Self {
        Self {
            extract_delay: Some((completed, delay)),
            ..Self::new(hits_per_query, "conteúdo")
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    /// Every query sent to the backend, after domain restriction
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_search {
            return Err(AppError::Search("Mock search failure".to_string()));
        }

        // Slug the query so each hit has a distinct, recognizable URL
        let slug: String = query
            .split_whitespace()
            .next()
            .unwrap_or("q")
            .to_lowercase();

        Ok((0..self.hits_per_query.min(max_results))
            .map(|i| SearchHit {
                title: format!("{} {}", slug, i),
                url: format!("https://www.gov.br/{}/{}", slug, i),
            })
            .collect())
    }

    async fn extract(&self, _url: &str) -> Result<Option<String>> {
        let call = self.extract_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((completed, delay)) = self.extract_delay {
            if call >= completed {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(self.content.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
