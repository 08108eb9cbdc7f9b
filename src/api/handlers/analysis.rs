use crate::{
    AppState,
    types::{
        AnalysisRequest, AnalysisResponse, AppError, ErrorBody, Result, StreamEvent,
        analysis_error_detail,
    },
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use std::{convert::Infallible, time::Duration};
use tokio::sync::mpsc;

/// Analyze a procurement question and return the cited answer
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Analysis completed", body = AnalysisResponse),
        (status = 413, description = "Request body too large", body = ErrorBody),
        (status = 422, description = "Invalid request body", body = ErrorBody),
        (status = 500, description = "Analysis failed", body = ErrorBody)
    ),
    tag = "analysis"
)]
pub async fn analyze(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>> {
    let request = validate(payload)?;

    tracing::info!(question = %request.question, "Analysis requested");
    let response = state.pipeline.analyze(&request.question).await?;

    Ok(Json(response))
}

/// Analyze a question, streaming stage progress as Server-Sent Events
///
/// Every SSE `data` field is a JSON object `{"type": "step" | "result" | "error", "data": {...}}`.
/// The stream ends after the `result` or `error` event.
#[utoipa::path(
    post,
    path = "/analyze/stream",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Event stream of StreamEvent objects", body = StreamEvent, content_type = "text/event-stream"),
        (status = 413, description = "Request body too large", body = ErrorBody),
        (status = 422, description = "Invalid request body", body = ErrorBody)
    ),
    tag = "analysis"
)]
pub async fn analyze_stream(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let request = validate(payload)?;

    tracing::info!(question = %request.question, "Streaming analysis requested");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = state.pipeline.clone();
    let question = request.question;

    // The sender lives in the task, so the channel closes when the run ends
    let run = tokio::spawn(async move { pipeline.analyze_with_progress(&question, Some(&tx)).await });

    let event_stream = async_stream::stream! {
        while let Some(step) = rx.recv().await {
            yield Ok(to_sse_event(&StreamEvent::Step(step)));
        }

        let last = match run.await {
            Ok(Ok(response)) => StreamEvent::Result(response),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Streaming analysis failed");
                StreamEvent::Error(ErrorBody { detail: analysis_error_detail(&e) })
            }
            Err(e) => {
                let e = AppError::Internal(format!("analysis task failed: {}", e));
                tracing::error!(error = %e, "Streaming analysis failed");
                StreamEvent::Error(ErrorBody { detail: analysis_error_detail(&e) })
            }
        };
        yield Ok(to_sse_event(&last));
    };

    Ok(Sse::new(event_stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    ))
}

fn validate(
    payload: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<AnalysisRequest> {
    // Everything but an oversized body is a validation failure
    let Json(request) = payload.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        _ => AppError::InvalidInput(e.body_text()),
    })?;

    if request.question.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "question must not be empty".to_string(),
        ));
    }

    Ok(request)
}

fn to_sse_event(event: &StreamEvent) -> Event {
    let kind = match event {
        StreamEvent::Step(_) => "step",
        StreamEvent::Result(_) => "result",
        StreamEvent::Error(_) => "error",
    };

    let payload = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(kind).data(payload)
}
