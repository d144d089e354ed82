//! Error handling for the dispatch pipeline
//!
//! Every failure a request can hit is one variant of [`QueryError`]. The
//! variants map one-to-one onto the error kinds callers see in the response
//! envelope; the HTTP layer picks the status code from the variant.

use thiserror::Error;

/// Message returned when a request carries no usable prompt.
pub const PROMPT_REQUIRED: &str = "`prompt` field required";

/// Main error type for the dispatch pipeline
#[derive(Error, Debug)]
pub enum QueryError {
    /// Missing/empty prompt or malformed request body. No upstream call made.
    #[error("{0}")]
    Input(String),

    /// The completion text did not yield a usable statement.
    #[error("{0}")]
    Extraction(String),

    /// The store rejected the statement. Carries the store's message verbatim.
    #[error("{0}")]
    Execution(String),

    /// The completion service failed or returned something unusable.
    #[error("Completion service error: {0}")]
    Completion(String),

    /// Schema source unreadable or empty.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Missing or invalid startup configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryError {
    pub fn prompt_required() -> Self {
        QueryError::Input(PROMPT_REQUIRED.to_string())
    }

    /// Wrap an upstream completion-service failure, keeping the full chain.
    pub fn completion(err: impl std::fmt::Display) -> Self {
        QueryError::Completion(format!("{:#}", err))
    }

    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Input(_) => "input",
            QueryError::Extraction(_) => "extraction",
            QueryError::Execution(_) => "execution",
            QueryError::Completion(_) => "completion",
            QueryError::Schema(_) => "schema",
            QueryError::Config(_) => "config",
            QueryError::Internal(_) => "internal",
        }
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for QueryError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(db) => QueryError::Execution(db.message().to_string()),
            other => QueryError::Execution(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(error: serde_json::Error) -> Self {
        QueryError::Internal(format!("Serialization error: {}", error))
    }
}

/// Result alias used throughout the pipeline
pub type QueryResult<T> = std::result::Result<T, QueryError>;
