//! Response normalization
//!
//! Shapes whatever the router produced, or the error it raised, into the
//! envelope that crosses the service boundary:
//! `{"status": "ok", "data": ...}` or `{"status": "error", "error": "..."}`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::QueryResult;
use crate::executor::ExecutionResult;

/// What the router hands back for one prompt
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutput {
    /// A statement ran
    Executed(ExecutionResult),
    /// The model answered without invoking a capability
    AgentText(String),
}

/// The only artifact crossing the system boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponseEnvelope {
    Ok { data: JsonValue },
    Error { error: String },
}

impl ResponseEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        ResponseEnvelope::Error {
            error: message.into(),
        }
    }
}

/// Wrap a routing outcome (or its error) in the response envelope.
pub fn normalize(outcome: QueryResult<RouteOutput>) -> ResponseEnvelope {
    match outcome {
        Ok(RouteOutput::Executed(result)) => match serde_json::to_value(&result) {
            Ok(data) => ResponseEnvelope::Ok { data },
            Err(e) => ResponseEnvelope::error(e.to_string()),
        },
        Ok(RouteOutput::AgentText(text)) => ResponseEnvelope::Ok {
            data: parse_serialized_result(&text).unwrap_or(JsonValue::String(text)),
        },
        Err(e) => ResponseEnvelope::error(e.to_string()),
    }
}

/// Single parse attempt: only text that is a serialized execution result
/// (`{"sql": ..., "rows": [...]}` or `{"sql": ..., "count": n}`) is lifted.
fn parse_serialized_result(text: &str) -> Option<JsonValue> {
    let value: JsonValue = serde_json::from_str(text.trim()).ok()?;
    let object = value.as_object()?;
    let has_sql = object.get("sql").is_some_and(JsonValue::is_string);
    let has_rows = object.get("rows").is_some_and(JsonValue::is_array);
    let has_count = object.get("count").is_some_and(JsonValue::is_u64);
    (has_sql && (has_rows || has_count)).then_some(value)
}
