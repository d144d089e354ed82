//! SQL extraction from model completions
//!
//! Models wrap SQL in markdown fences, add a trailing semicolon, or pad with
//! whitespace. [`extract`] reduces a completion to one statement and is the
//! only way to obtain an [`ExtractedSql`], so everything handed to the
//! executor has passed through it.
//!
//! No syntax or semantic validation happens here; bad SQL surfaces when the
//! store executes it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{QueryError, QueryResult};

/// First fenced block, optionally tagged `sql`. Lazy up to the closing fence.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:sql)?\s*([\s\S]*?)```").unwrap());

const TERMINATOR: char = ';';

/// A single statement: non-empty, trimmed, no trailing terminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExtractedSql(String);

impl ExtractedSql {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExtractedSql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExtractedSql {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reduce a completion (or a literal SQL prompt) to one clean statement.
///
/// Uses the interior of the first fenced block if there is one, else the
/// whole text; trims it and removes exactly one trailing `;`. A statement
/// still ending in `;` after that is rejected, as is an empty one.
pub fn extract(completion: &str) -> QueryResult<ExtractedSql> {
    let body = FENCE_RE
        .captures(completion)
        .and_then(|caps| caps.get(1))
        .map_or(completion, |m| m.as_str());

    let trimmed = body.trim();
    let statement = trimmed
        .strip_suffix(TERMINATOR)
        .map_or(trimmed, str::trim_end);

    if statement.is_empty() {
        return Err(QueryError::Extraction(
            "completion did not contain a SQL statement".to_string(),
        ));
    }
    if statement.ends_with(TERMINATOR) {
        return Err(QueryError::Extraction(format!(
            "statement ends with repeated terminators: {}",
            trimmed
        )));
    }

    Ok(ExtractedSql(statement.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_sql_block() {
        let completion = "Here is the query:\n```sql\nSELECT * FROM \"Restaurant\" WHERE city = 'Chicago';\n```\nLet me know!";
        let sql = extract(completion).unwrap();
        assert_eq!(
            sql.as_str(),
            "SELECT * FROM \"Restaurant\" WHERE city = 'Chicago'"
        );
    }

    #[test]
    fn test_untagged_and_uppercase_tag() {
        assert_eq!(extract("```\nDELETE FROM t\n```").unwrap().as_str(), "DELETE FROM t");
        assert_eq!(extract("```SQL\nSELECT 1;```").unwrap().as_str(), "SELECT 1");
    }

    #[test]
    fn test_first_block_wins() {
        let completion = "```sql\nSELECT 1\n```\nor\n```sql\nSELECT 2\n```";
        assert_eq!(extract(completion).unwrap().as_str(), "SELECT 1");
    }

    #[test]
    fn test_unfenced_text() {
        assert_eq!(
            extract("  UPDATE \"User\" SET name = 'x' WHERE id = 1;\n").unwrap().as_str(),
            "UPDATE \"User\" SET name = 'x' WHERE id = 1"
        );
    }

    #[test]
    fn test_unclosed_fence_uses_whole_text() {
        assert_eq!(extract("```sql SELECT 1").unwrap().as_str(), "```sql SELECT 1");
    }

    #[test]
    fn test_only_one_terminator_removed() {
        let err = extract("SELECT 1;;").unwrap_err();
        assert_eq!(err.kind(), "extraction");
    }

    #[test]
    fn test_whitespace_before_terminator() {
        let sql = extract("SELECT 1 ;").unwrap();
        assert_eq!(sql.as_str(), "SELECT 1");
        assert_eq!(extract(sql.as_str()).unwrap(), sql);
    }

    #[test]
    fn test_inner_semicolons_kept() {
        let sql = extract("INSERT INTO t (s) VALUES ('a;b');").unwrap();
        assert_eq!(sql.as_str(), "INSERT INTO t (s) VALUES ('a;b')");
    }

    #[test]
    fn test_empty_results_rejected() {
        for text in ["", "   ", ";", "```sql\n```", "```sql\n;\n```"] {
            let err = extract(text).unwrap_err();
            assert_eq!(err.kind(), "extraction", "input {:?}", text);
        }
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let sql = extract("SELECT 1;").unwrap();
        assert_eq!(serde_json::to_value(&sql).unwrap(), serde_json::json!("SELECT 1"));
    }
}
