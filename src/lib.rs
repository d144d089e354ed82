//! nl-query - Natural Language to SQL Dispatch
//!
//! This crate turns a natural-language instruction into a single SQL
//! statement against a fixed relational schema, executes it, and returns a
//! uniform response envelope.
//!
//! ## Pipeline
//!
//! ```text
//! prompt -> Router -> (fast path | agent capability selection)
//!        -> PromptBuilder + Schema -> LlmClient -> extract() -> QueryExecutor
//!        -> normalize() -> ResponseEnvelope
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use nl_query::extract::extract;
//!
//! let sql = extract("```sql\nSELECT * FROM \"User\";\n```").unwrap();
//! assert_eq!(sql.as_str(), "SELECT * FROM \"User\"");
//! ```
//!
//! ## Backend Selection
//!
//! Set `LLM_BACKEND` environment variable:
//! - `groq` (default): Groq OpenAI-compatible API
//! - `openai`: OpenAI API
//! - `anthropic`: Anthropic Claude API

// Core error handling
pub mod error;

// Configuration
pub mod config;

// Pipeline components
pub mod agent;
pub mod executor;
pub mod extract;
pub mod operation;
pub mod prompt;
pub mod response;
pub mod router;
pub mod schema;

// LLM client abstraction
pub mod llm;

// Database integration (when enabled)
#[cfg(feature = "database")]
pub mod database;

// REST API (when enabled)
#[cfg(feature = "server")]
pub mod api;

pub use agent::{AgentDecision, CapabilitySelector};
pub use config::{LlmConfig, ServerConfig};
pub use error::{QueryError, QueryResult};
pub use executor::{ExecutionResult, QueryExecutor, Record, SqlStore};
pub use extract::{extract, ExtractedSql};
pub use llm::{create_llm_client, LlmBackend, LlmClient};
pub use operation::{ExecutionMode, OperationKind, OperationSpec};
pub use prompt::{PromptBuilder, PromptMessage, Role};
pub use response::{normalize, ResponseEnvelope, RouteOutput};
pub use router::OperationRouter;
pub use schema::SchemaDocument;

#[cfg(feature = "database")]
pub use database::{DatabaseConfig, PgStore};
