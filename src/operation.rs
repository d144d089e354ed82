//! Operation catalogue
//!
//! The fixed set of operation classes the router can dispatch to. Four of
//! them are exposed to the model as capabilities; `Raw` is reached only
//! through the literal-SQL fast path.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the store is asked to run a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionMode {
    /// Query returning a record sequence
    Rows,
    /// Statement returning the affected-row count
    AffectedCount,
}

/// Operation class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Select,
    Create,
    Update,
    Delete,
    /// Caller already sent SQL; mode comes from its leading keyword
    Raw,
}

/// Static description of one operation class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub kind: OperationKind,
    /// Appended to the system prompt; `None` for `Raw`
    pub directive: Option<&'static str>,
    /// `None` for `Raw`, whose mode depends on the statement
    pub mode: Option<ExecutionMode>,
    /// Capability description shown to the model; `None` for `Raw`,
    /// which is never offered
    pub description: Option<&'static str>,
}

const SELECT: OperationSpec = OperationSpec {
    kind: OperationKind::Select,
    directive: Some("generate a SELECT."),
    mode: Some(ExecutionMode::Rows),
    description: Some("SELECT rows based on a natural-language prompt"),
};

const CREATE: OperationSpec = OperationSpec {
    kind: OperationKind::Create,
    directive: Some("generate an INSERT."),
    mode: Some(ExecutionMode::AffectedCount),
    description: Some("CREATE rows based on a natural-language prompt"),
};

const UPDATE: OperationSpec = OperationSpec {
    kind: OperationKind::Update,
    directive: Some("generate an UPDATE."),
    mode: Some(ExecutionMode::AffectedCount),
    description: Some("UPDATE rows based on a natural-language prompt"),
};

const DELETE: OperationSpec = OperationSpec {
    kind: OperationKind::Delete,
    directive: Some("generate a DELETE."),
    mode: Some(ExecutionMode::AffectedCount),
    description: Some("DELETE rows based on a natural-language prompt"),
};

const RAW: OperationSpec = OperationSpec {
    kind: OperationKind::Raw,
    directive: None,
    mode: None,
    description: None,
};

/// Capabilities offered to the model, in declaration order
pub const CAPABILITIES: [OperationKind; 4] = [
    OperationKind::Select,
    OperationKind::Create,
    OperationKind::Update,
    OperationKind::Delete,
];

impl OperationKind {
    pub fn spec(&self) -> &'static OperationSpec {
        match self {
            OperationKind::Select => &SELECT,
            OperationKind::Create => &CREATE,
            OperationKind::Update => &UPDATE,
            OperationKind::Delete => &DELETE,
            OperationKind::Raw => &RAW,
        }
    }

    /// Capability / log name
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Select => "select",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
            OperationKind::Raw => "raw",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error type for parsing OperationKind
#[derive(Debug)]
pub struct ParseOperationError(String);

impl std::fmt::Display for ParseOperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseOperationError {}

impl FromStr for OperationKind {
    type Err = ParseOperationError;

    /// Parses capability names only; `raw` is never offered to the model.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "select" => Ok(OperationKind::Select),
            "create" => Ok(OperationKind::Create),
            "update" => Ok(OperationKind::Update),
            "delete" => Ok(OperationKind::Delete),
            other => Err(ParseOperationError(format!(
                "Unknown capability '{}'. Valid values: select, create, update, delete",
                other
            ))),
        }
    }
}

/// Classify a prompt that is already SQL by its leading keyword.
///
/// Returns the execution mode for the fast path, or `None` when the prompt
/// should go to the model. The keyword must be followed by a non-word
/// character (or end of input), so "selection of restaurants" is not SQL.
pub fn classify_literal_sql(prompt: &str) -> Option<ExecutionMode> {
    let trimmed = prompt.trim_start();
    let keyword_len = trimmed
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (keyword, rest) = trimmed.split_at(keyword_len);

    if rest
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        return None;
    }

    match keyword.to_ascii_uppercase().as_str() {
        "SELECT" => Some(ExecutionMode::Rows),
        "INSERT" | "UPDATE" | "DELETE" => Some(ExecutionMode::AffectedCount),
        _ => None,
    }
}
