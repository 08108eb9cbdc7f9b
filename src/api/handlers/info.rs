use crate::{
    research::prompts::EXAMPLE_QUESTIONS,
    types::{ExamplesResponse, HealthResponse, RootResponse, timestamp},
};
use axum::Json;

/// API banner
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "API name", body = RootResponse)),
    tag = "info"
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Analisador de Licitações API - Lei 14.133/2021".to_string(),
    })
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "info"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: timestamp(),
    })
}

/// Sample questions about procurement
#[utoipa::path(
    get,
    path = "/examples",
    responses((status = 200, description = "Fixed list of example questions", body = ExamplesResponse)),
    tag = "info"
)]
pub async fn get_example_questions() -> Json<ExamplesResponse> {
    Json(ExamplesResponse {
        examples: EXAMPLE_QUESTIONS.iter().map(|q| q.to_string()).collect(),
    })
}
