use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AnalysisResponse {
    pub question: String,
    pub analysis: String,
    pub references: String,
    pub thinking_process: String,
    pub timestamp: String,
    pub status: String,
}

/// A progress notification emitted when a pipeline stage starts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AnalysisStep {
    pub step: String,
    pub message: String,
    pub timestamp: String,
}

/// One event on the `/analyze/stream` channel.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StreamEvent {
    Step(AnalysisStep),
    Result(AnalysisResponse),
    Error(ErrorBody),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExamplesResponse {
    pub examples: Vec<String>,
}

// ============= Pipeline Types =============

/// Structured output of the query-generation step.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QueryList {
    pub queries: Vec<String>,
}

/// A summarized search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub title: String,
    pub url: String,
    pub resume: String,
}

/// A [`QueryResult`] with the citation number it is rendered under in both
/// the evidence block and the references block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitedResult {
    pub citation: usize,
    #[serde(flatten)]
    pub result: QueryResult,
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowState {
    pub user_input: String,
    pub queries: Vec<String>,
    pub queries_results: Vec<CitedResult>,
    pub final_response: String,
}

// ============= Search Types =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Query generation error: {0}")]
    Generation(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match self {
            AppError::InvalidInput(msg) => (axum::http::StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::PayloadTooLarge(msg) => (axum::http::StatusCode::PAYLOAD_TOO_LARGE, msg),
            other => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                analysis_error_detail(&other),
            ),
        };

        (status, axum::Json(ErrorBody { detail })).into_response()
    }
}

/// Client-facing message for a failed analysis.
pub fn analysis_error_detail(err: &AppError) -> String {
    format!("Erro na análise: {}", err)
}

pub type Result<T> = std::result::Result<T, AppError>;

/// ISO-8601 local timestamp used in API payloads
pub fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}
