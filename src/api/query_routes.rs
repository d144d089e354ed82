//! Query endpoint
//!
//! - POST /query  - `{"prompt": "..."}` -> response envelope
//!
//! Every other method or path answers 404 with an error envelope.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::QueryError;
use crate::response::{normalize, ResponseEnvelope};
use crate::router::OperationRouter;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub prompt: Option<String>,
}

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct QueryState {
    pub router: Arc<OperationRouter>,
}

/// Build the router with the query route, not-found fallback and tracing
pub fn create_query_router(router: Arc<OperationRouter>) -> Router {
    Router::new()
        .route("/query", post(run_query).fallback(not_found))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(QueryState { router })
}

/// HTTP status for a pipeline error
pub fn status_for(error: &QueryError) -> StatusCode {
    match error {
        QueryError::Input(_) | QueryError::Extraction(_) | QueryError::Execution(_) => {
            StatusCode::BAD_REQUEST
        }
        QueryError::Completion(_) => StatusCode::BAD_GATEWAY,
        QueryError::Schema(_) | QueryError::Config(_) | QueryError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn envelope_response(status: StatusCode, envelope: &ResponseEnvelope) -> Response {
    let body = serde_json::to_string_pretty(envelope)
        .unwrap_or_else(|_| r#"{"status":"error","error":"Serialization failed"}"#.to_string());
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /query
async fn run_query(
    State(state): State<QueryState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("REQUEST ERROR: {}", rejection.body_text());
            return envelope_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ResponseEnvelope::error("Request error"),
            );
        }
    };

    let outcome = match parse_prompt(&body) {
        Ok(prompt) => state.router.route(&prompt).await,
        Err(e) => Err(e),
    };

    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!("ERROR ({}): {}", e.kind(), e);
            status_for(e)
        }
    };
    envelope_response(status, &normalize(outcome))
}

fn parse_prompt(body: &[u8]) -> Result<String, QueryError> {
    let request: QueryRequest = serde_json::from_slice(body)
        .map_err(|e| QueryError::Input(format!("Invalid request body: {}", e)))?;
    request
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(QueryError::prompt_required)
}

async fn not_found() -> Response {
    envelope_response(StatusCode::NOT_FOUND, &ResponseEnvelope::error("Not found"))
}
