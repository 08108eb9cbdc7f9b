use crate::{
    llm::{LLMClient, ModelHandles, invoke_structured},
    research::{postprocess::split_response, prompts},
    search::{SearchProvider, restrict_to_domains},
    types::{
        AnalysisResponse, AnalysisStep, AppError, CitedResult, QueryList, QueryResult, Result,
        WorkflowState, timestamp,
    },
    utils::toml_config::LicitaConfigManager,
};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinSet, time::Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Receives an [`AnalysisStep`] as each stage starts.
pub type ProgressSender = mpsc::UnboundedSender<AnalysisStep>;

/// Separator between the synthesis text and the appended references block.
pub const REFERENCES_SEPARATOR: &str = "\n\n References:\n";

/// Runs the four-stage analysis: query generation, one search branch per
/// query, barrier, and final synthesis.
#[derive(Clone)]
pub struct AnalysisPipeline {
    models: ModelHandles,
    search: Arc<dyn SearchProvider>,
    config: Arc<LicitaConfigManager>,
}

/// Per-run snapshot of the tunables each branch needs.
#[derive(Debug, Clone)]
struct BranchSettings {
    max_results: usize,
    allowed_domains: Arc<[String]>,
    timeout: Option<Duration>,
}

impl AnalysisPipeline {
    pub fn new(
        models: ModelHandles,
        search: Arc<dyn SearchProvider>,
        config: Arc<LicitaConfigManager>,
    ) -> Self {
        Self {
            models,
            search,
            config,
        }
    }

    /// Run the pipeline and split the synthesis into response fields
    pub async fn analyze(&self, question: &str) -> Result<AnalysisResponse> {
        self.analyze_with_progress(question, None).await
    }

    /// Like [`analyze`](Self::analyze), reporting stage starts on `progress`
    pub async fn analyze_with_progress(
        &self,
        question: &str,
        progress: Option<&ProgressSender>,
    ) -> Result<AnalysisResponse> {
        let state = self.run_with_progress(question, progress).await?;
        Ok(build_response(question, &state))
    }

    /// Execute the pipeline, returning the full workflow state
    pub async fn run(&self, question: &str) -> Result<WorkflowState> {
        self.run_with_progress(question, None).await
    }

    pub async fn run_with_progress(
        &self,
        question: &str,
        progress: Option<&ProgressSender>,
    ) -> Result<WorkflowState> {
        if question.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let span = tracing::info_span!("analysis", run_id = %Uuid::new_v4());
        self.execute(question, progress).instrument(span).await
    }

    async fn execute(
        &self,
        question: &str,
        progress: Option<&ProgressSender>,
    ) -> Result<WorkflowState> {
        let settings = self.branch_settings();

        report(
            progress,
            "build_queries",
            "🔍 Gerando consultas específicas sobre licitações...",
        );
        let queries = self.build_first_queries(question).await?;
        tracing::info!(count = queries.len(), "Generated search queries");

        report(
            progress,
            "search",
            "📋 Buscando informações na legislação oficial...",
        );
        let queries_results = self.spawn_researchers(&queries, &settings).await?;
        tracing::info!(results = queries_results.len(), "Search branches finished");

        report(progress, "analysis", "✍️ Elaborando análise técnica...");
        let final_response = self.final_writer(question, &queries_results).await?;

        Ok(WorkflowState {
            user_input: question.to_string(),
            queries,
            queries_results,
            final_response,
        })
    }

    fn branch_settings(&self) -> BranchSettings {
        let config = self.config.config();
        BranchSettings {
            max_results: config.search.max_results,
            allowed_domains: config.search.allowed_domains.clone().into(),
            timeout: config.pipeline.branch_timeout(),
        }
    }

    async fn build_first_queries(&self, user_input: &str) -> Result<Vec<String>> {
        let prompt = prompts::build_queries(user_input);
        let list: QueryList = invoke_structured(self.models.general.as_ref(), &prompt).await?;

        Ok(list.queries)
    }

    /// Fan out one branch per query and wait for all of them.
    ///
    /// Any branch error aborts the remaining branches and fails the run.
    async fn spawn_researchers(
        &self,
        queries: &[String],
        settings: &BranchSettings,
    ) -> Result<Vec<CitedResult>> {
        let mut set = JoinSet::new();

        for (index, query) in queries.iter().enumerate() {
            let llm = Arc::clone(&self.models.general);
            let search = Arc::clone(&self.search);
            let query = query.clone();
            let settings = settings.clone();
            let span = tracing::debug_span!("branch", index, query = %query);

            set.spawn(
                async move {
                    let results =
                        single_search(llm.as_ref(), search.as_ref(), &query, &settings).await?;
                    Ok::<_, AppError>((index, results))
                }
                .instrument(span),
            );
        }

        let mut branches = Vec::with_capacity(queries.len());
        while let Some(joined) = set.join_next().await {
            let branch = joined
                .map_err(|e| AppError::Internal(format!("Search branch panicked: {}", e)))??;
            branches.push(branch);
        }

        Ok(merge_branches(branches))
    }

    async fn final_writer(&self, user_input: &str, results: &[CitedResult]) -> Result<String> {
        let (search_results, references) = render_evidence(results);
        let prompt = prompts::build_final_response(user_input, &search_results);

        let content = self
            .models
            .reasoning
            .generate(&prompt)
            .await
            .map_err(|e| AppError::Synthesis(e.to_string()))?;

        tracing::debug!(
            model = self.models.reasoning.model_name(),
            chars = content.len(),
            "Synthesis complete"
        );

        Ok(format!("{}{}{}", content, REFERENCES_SEPARATOR, references))
    }
}

/// Search, extract and summarize for one query.
///
/// Search and extraction problems only shrink the result list; a failed
/// summarization call is returned as an error. When the branch deadline
/// passes, the summaries finished so far are kept and the rest are dropped.
async fn single_search(
    llm: &dyn LLMClient,
    search: &dyn SearchProvider,
    query: &str,
    settings: &BranchSettings,
) -> Result<Vec<QueryResult>> {
    let deadline = settings.timeout.map(|limit| Instant::now() + limit);
    let search_query = restrict_to_domains(query, &settings.allowed_domains);

    let hits = match before(deadline, search.search(&search_query, settings.max_results)).await {
        Some(Ok(hits)) => hits,
        Some(Err(e)) => {
            tracing::warn!(backend = search.name(), error = %e, "Search failed; skipping query");
            return Ok(Vec::new());
        }
        None => {
            tracing::warn!(limit = ?settings.timeout, "Branch timed out during search");
            return Ok(Vec::new());
        }
    };

    let mut query_results = Vec::with_capacity(hits.len());
    for hit in hits {
        let Some(resume) = before(deadline, summarize_hit(llm, search, query, &hit.url)).await
        else {
            tracing::warn!(
                limit = ?settings.timeout,
                kept = query_results.len(),
                "Branch timed out; keeping finished summaries"
            );
            break;
        };

        if let Some(resume) = resume? {
            query_results.push(QueryResult {
                title: hit.title,
                url: hit.url,
                resume,
            });
        }
    }

    Ok(query_results)
}

/// Extract one page and summarize it; `None` when the page yields nothing.
async fn summarize_hit(
    llm: &dyn LLMClient,
    search: &dyn SearchProvider,
    query: &str,
    url: &str,
) -> Result<Option<String>> {
    let raw_content = match search.extract(url).await {
        Ok(Some(content)) => content,
        Ok(None) => {
            tracing::debug!(url, "No content extracted");
            return Ok(None);
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Extraction failed; skipping hit");
            return Ok(None);
        }
    };

    let prompt = prompts::resume_search(query, &raw_content);
    llm.generate(&prompt).await.map(Some)
}

/// Await `future` unless `deadline` passes first.
async fn before<F: Future>(deadline: Option<Instant>, future: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}

fn report(progress: Option<&ProgressSender>, step: &str, message: &str) {
    tracing::info!(step, "{}", message);

    if let Some(tx) = progress {
        // The receiver may have gone away (client disconnected); the run continues
        let _ = tx.send(AnalysisStep {
            step: step.to_string(),
            message: message.to_string(),
            timestamp: timestamp(),
        });
    }
}

/// Order branch output by query position and number it from 1.
pub fn merge_branches(mut branches: Vec<(usize, Vec<QueryResult>)>) -> Vec<CitedResult> {
    branches.sort_by_key(|(index, _)| *index);

    branches
        .into_iter()
        .flat_map(|(_, results)| results)
        .enumerate()
        .map(|(i, result)| CitedResult {
            citation: i + 1,
            result,
        })
        .collect()
}

/// Render the evidence block for the synthesis prompt and the matching
/// references block.
pub fn render_evidence(results: &[CitedResult]) -> (String, String) {
    let mut search_results = String::new();
    let mut references = String::new();

    for cited in results {
        let n = cited.citation;
        let r = &cited.result;

        search_results.push_str(&format!("[{}]\n\n", n));
        search_results.push_str(&format!("Title: {}\n", r.title));
        search_results.push_str(&format!("URL: {}\n", r.url));
        search_results.push_str(&format!("Content: {}\n", r.resume));
        search_results.push_str("================\n\n");

        references.push_str(&format!("[{}] - [{}]({})\n", n, r.title, r.url));
    }

    (search_results, references)
}

/// Map a finished run onto the API response.
pub fn build_response(question: &str, state: &WorkflowState) -> AnalysisResponse {
    let parsed = split_response(&state.final_response);

    AnalysisResponse {
        question: question.to_string(),
        analysis: parsed.analysis,
        references: parsed.references,
        thinking_process: parsed.thinking_process,
        timestamp: timestamp(),
        status: "completed".to_string(),
    }
}
