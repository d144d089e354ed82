//! Query Executor
//!
//! Runs an [`ExtractedSql`] against the relational store with the execution
//! mode of the governing operation. The store itself sits behind the
//! [`SqlStore`] trait; the Postgres implementation lives in
//! [`crate::database`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::QueryResult;
use crate::extract::ExtractedSql;
use crate::operation::ExecutionMode;

/// One result row, keyed by the store's column names
pub type Record = serde_json::Map<String, JsonValue>;

/// Raw-SQL interface of the relational store
///
/// Implementations execute the text as given. Failures must come back as
/// [`crate::QueryError::Execution`] carrying the store's own message.
#[async_trait]
pub trait SqlStore: Send + Sync {
    /// Execute a query and return every record, in store order
    async fn fetch_rows(&self, sql: &ExtractedSql) -> QueryResult<Vec<Record>>;

    /// Execute a statement and return the affected-row count
    async fn execute_statement(&self, sql: &ExtractedSql) -> QueryResult<u64>;
}

/// Outcome of one executed statement
///
/// Serializes as `{"sql": ..., "rows": [...]}` or `{"sql": ..., "count": n}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecutionResult {
    Rows { sql: ExtractedSql, rows: Vec<Record> },
    Count { sql: ExtractedSql, count: u64 },
}

/// Executor dispatching on execution mode
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn SqlStore>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn SqlStore>) -> Self {
        Self { store }
    }

    /// Execute `sql` as a query (`Rows`) or a statement (`AffectedCount`).
    pub async fn execute(
        &self,
        mode: ExecutionMode,
        sql: ExtractedSql,
    ) -> QueryResult<ExecutionResult> {
        let outcome = match mode {
            ExecutionMode::Rows => self
                .store
                .fetch_rows(&sql)
                .await
                .map(|rows| {
                    debug!("Query returned {} rows", rows.len());
                    ExecutionResult::Rows {
                        sql: sql.clone(),
                        rows,
                    }
                }),
            ExecutionMode::AffectedCount => self
                .store
                .execute_statement(&sql)
                .await
                .map(|count| {
                    debug!("Statement affected {} rows", count);
                    ExecutionResult::Count {
                        sql: sql.clone(),
                        count,
                    }
                }),
        };

        if let Err(e) = &outcome {
            warn!("Execution failed for `{}`: {}", sql, e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::extract::extract;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<(&'static str, String)>>,
    }

    #[async_trait]
    impl SqlStore for RecordingStore {
        async fn fetch_rows(&self, sql: &ExtractedSql) -> QueryResult<Vec<Record>> {
            self.calls.lock().unwrap().push(("rows", sql.to_string()));
            let mut first = Record::new();
            first.insert("id".to_string(), json!(1));
            let mut second = Record::new();
            second.insert("id".to_string(), json!(2));
            Ok(vec![first, second])
        }

        async fn execute_statement(&self, sql: &ExtractedSql) -> QueryResult<u64> {
            self.calls.lock().unwrap().push(("count", sql.to_string()));
            if sql.as_str().contains("SELEC ") {
                return Err(QueryError::Execution(
                    "syntax error at or near \"SELEC\"".to_string(),
                ));
            }
            Ok(3)
        }
    }

    #[tokio::test]
    async fn test_rows_mode_preserves_order() {
        let store = Arc::new(RecordingStore::default());
        let executor = QueryExecutor::new(store.clone());

        let result = executor
            .execute(ExecutionMode::Rows, extract("SELECT id FROM t").unwrap())
            .await
            .unwrap();

        assert!(matches!(result, ExecutionResult::Rows { .. }));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"sql": "SELECT id FROM t", "rows": [{"id": 1}, {"id": 2}]})
        );
        assert_eq!(store.calls.lock().unwrap()[0].0, "rows");
    }

    #[tokio::test]
    async fn test_count_mode() {
        let store = Arc::new(RecordingStore::default());
        let executor = QueryExecutor::new(store.clone());

        let result = executor
            .execute(
                ExecutionMode::AffectedCount,
                extract("DELETE FROM t WHERE id > 1;").unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"sql": "DELETE FROM t WHERE id > 1", "count": 3})
        );
        assert_eq!(
            store.calls.lock().unwrap().as_slice(),
            &[("count", "DELETE FROM t WHERE id > 1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let executor = QueryExecutor::new(Arc::new(RecordingStore::default()));
        let err = executor
            .execute(
                ExecutionMode::AffectedCount,
                extract("SELEC FROM t").unwrap(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "syntax error at or near \"SELEC\"");
    }
}
