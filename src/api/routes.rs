use crate::AppState;
use crate::api::handlers::{analysis, info};
use crate::types::{
    AnalysisRequest, AnalysisResponse, AnalysisStep, ErrorBody, ExamplesResponse, HealthResponse,
    RootResponse, StreamEvent,
};
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Questions are short; anything larger is rejected before deserialization
const MAX_BODY_BYTES: usize = 64 * 1024;

/// OpenAPI document for the HTTP surface
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Analisador de Licitações API",
        version = "1.0.0",
        description = "Perguntas sobre a Lei 14.133/2021 e o Decreto 1.525/2022"
    ),
    paths(
        info::root,
        info::health_check,
        info::get_example_questions,
        analysis::analyze,
        analysis::analyze_stream,
    ),
    components(schemas(
        AnalysisRequest,
        AnalysisResponse,
        AnalysisStep,
        StreamEvent,
        ErrorBody,
        RootResponse,
        HealthResponse,
        ExamplesResponse,
    )),
    tags(
        (name = "analysis", description = "Procurement question analysis"),
        (name = "info", description = "Service information")
    )
)]
pub struct ApiDoc;

/// Build the application router with CORS and request tracing
pub fn create_router(state: AppState) -> Router {
    let origins = state.config_manager.config().server.cors_origins.clone();

    let router = Router::new()
        .route("/", get(info::root))
        .route("/health", get(info::health_check))
        .route("/examples", get(info::get_example_questions))
        .route("/analyze", post(analysis::analyze))
        .route("/analyze/stream", post(analysis::analyze_stream));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    );

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&origins))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

/// CORS for the configured browser origins only, any method and header
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
