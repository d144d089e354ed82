//! Environment-driven configuration
//!
//! Reads:
//!   DATABASE_URL        - Postgres connection string (required)
//!   LLM_BACKEND         - groq | openai | anthropic (default: groq)
//!   GROQ_API_KEY / OPENAI_API_KEY / ANTHROPIC_API_KEY
//!                       - credential for the chosen backend (required)
//!   LLM_MODEL           - model override (default: per backend)
//!   SCHEMA_PATH         - schema text file (default: ./schema.prisma)
//!   BIND_ADDR           - listen address (default: 0.0.0.0:9000)
//!   DATABASE_POOL_SIZE  - max pool connections (default: 10)

use std::path::PathBuf;

use crate::error::{QueryError, QueryResult};
use crate::llm::LlmBackend;
use crate::schema::DEFAULT_SCHEMA_PATH;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Completion service settings
#[derive(Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: String,
    /// `None` means the backend's default model
    pub model: Option<String>,
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("backend", &self.backend)
            .field("api_key", &"***")
            .field("model", &self.model())
            .finish()
    }
}

/// Everything the server needs at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub pool_size: u32,
    pub llm: LlmConfig,
    pub schema_path: PathBuf,
    pub bind_addr: String,
}

impl ServerConfig {
    /// Read from the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> QueryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> QueryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("LLM_BACKEND") {
            Some(value) => value
                .parse::<LlmBackend>()
                .map_err(|e| QueryError::Config(e.to_string()))?,
            None => LlmBackend::default(),
        };

        let database_url = get("DATABASE_URL");
        let api_key = get(backend.api_key_var());
        let (database_url, api_key) = match (database_url, api_key) {
            (Some(url), Some(key)) => (url, key),
            _ => {
                return Err(QueryError::Config(format!(
                    "set DATABASE_URL and {} in the environment or .env",
                    backend.api_key_var()
                )))
            }
        };

        let pool_size = match get("DATABASE_POOL_SIZE") {
            Some(value) => value.parse::<u32>().map_err(|_| {
                QueryError::Config(format!("DATABASE_POOL_SIZE must be a number, got '{}'", value))
            })?,
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            pool_size,
            llm: LlmConfig {
                backend,
                api_key,
                model: get("LLM_MODEL"),
            },
            schema_path: get("SCHEMA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH)),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

/// Hide the password in a connection string before logging it
pub fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut masked = parsed.clone();
        if parsed.password().is_some() {
            let _ = masked.set_password(Some("***"));
        }
        masked.to_string()
    } else {
        "***".to_string()
    }
}
