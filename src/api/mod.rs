//! REST API module
//!
//! HTTP transport for the pipeline. All dispatch logic lives in
//! [`crate::router`]; this layer only decodes the request body, maps error
//! kinds to status codes and writes the envelope.

pub mod query_routes;

pub use query_routes::{create_query_router, status_for, QueryRequest, QueryState};
