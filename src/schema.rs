//! Schema context
//!
//! Holds the schema description every prompt is grounded on. The text is
//! opaque to this crate: it is loaded once at startup and never parsed.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::{QueryError, QueryResult};

/// Default schema location, relative to the working directory
pub const DEFAULT_SCHEMA_PATH: &str = "./schema.prisma";

/// Immutable schema text shared by every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    text: Arc<str>,
}

impl SchemaDocument {
    /// Load the schema from disk. Failure means the process cannot serve.
    pub fn load(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            QueryError::Schema(format!("cannot read schema {}: {}", path.display(), e))
        })?;

        let document = Self::from_text(text).map_err(|_| {
            QueryError::Schema(format!("schema {} is empty", path.display()))
        })?;

        info!(
            "Loaded schema from {} ({} bytes)",
            path.display(),
            document.text.len()
        );
        Ok(document)
    }

    /// Build from in-memory text
    pub fn from_text(text: impl Into<String>) -> QueryResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QueryError::Schema("schema text is empty".to_string()));
        }
        Ok(Self {
            text: Arc::from(text),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
