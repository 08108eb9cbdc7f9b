//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions, CORS and OpenAPI document
//!
//! # API Endpoints
//!
//! - `GET /` - API banner
//! - `GET /health` - Health check
//! - `GET /examples` - Eight sample questions
//! - `POST /analyze` - Run the analysis and return the cited answer
//! - `POST /analyze/stream` - Same analysis as Server-Sent Events with stage progress
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! Failed analyses answer `500` with `{"detail": "Erro na análise: <message>"}`;
//! malformed or empty requests answer `422` with `{"detail": ...}`.
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
