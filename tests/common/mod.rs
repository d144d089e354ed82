//! Shared fakes for router and HTTP tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use nl_query::llm::{ToolCallResult, ToolDefinition, ToolResponse};
use nl_query::{
    ExtractedSql, LlmClient, OperationRouter, PromptMessage, QueryError, QueryResult, Record,
    SchemaDocument, SqlStore,
};

pub const TEST_SCHEMA: &str = r#"model Restaurant {
  id   Int    @id @default(autoincrement())
  name String
  city String
}

model User {
  id    Int    @id @default(autoincrement())
  email String @unique
}"#;

/// Completion service with canned answers
pub struct FakeLlm {
    pub decision: ToolResponse,
    pub completion: String,
    pub complete_calls: AtomicUsize,
    pub tool_calls: AtomicUsize,
    pub last_messages: Mutex<Vec<PromptMessage>>,
}

impl FakeLlm {
    pub fn invoking(capability: &str, completion: &str) -> Self {
        Self::new(
            ToolResponse::ToolCall(ToolCallResult {
                tool_name: capability.to_string(),
                arguments: json!({ "input": "rephrased by the model" }),
            }),
            completion,
        )
    }

    pub fn answering(text: &str) -> Self {
        Self::new(ToolResponse::Text(text.to_string()), "")
    }

    fn new(decision: ToolResponse, completion: &str) -> Self {
        Self {
            decision,
            completion: completion.to_string(),
            complete_calls: AtomicUsize::new(0),
            tool_calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst) + self.tool_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        Ok(self.completion.clone())
    }

    async fn chat_with_tools(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _tools: &[ToolDefinition],
    ) -> Result<ToolResponse> {
        self.tool_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.decision.clone())
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }

    fn provider_name(&self) -> &str {
        "Fake"
    }
}

/// In-memory store that records every statement it is given.
///
/// Statements containing the misspelling `FORM` fail like Postgres would. Mutations
/// report one affected row per `'` pair in the text, so concurrent callers
/// can tell their counts apart.
#[derive(Default)]
pub struct FakeStore {
    pub rows: Vec<Record>,
    pub executed: Mutex<Vec<String>>,
    pub delay: Option<Duration>,
    pub in_flight: AtomicUsize,
    /// Most statements ever running at once
    pub peak_in_flight: AtomicUsize,
}

impl FakeStore {
    pub fn with_rows(rows: Vec<Record>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    async fn run(&self, sql: &ExtractedSql) -> QueryResult<()> {
        self.executed.lock().unwrap().push(sql.to_string());
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if sql.as_str().contains(" FORM ") {
            return Err(QueryError::Execution(
                "syntax error at or near \"FORM\"".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SqlStore for FakeStore {
    async fn fetch_rows(&self, sql: &ExtractedSql) -> QueryResult<Vec<Record>> {
        self.run(sql).await?;
        Ok(self.rows.clone())
    }

    async fn execute_statement(&self, sql: &ExtractedSql) -> QueryResult<u64> {
        self.run(sql).await?;
        Ok((sql.as_str().matches('\'').count() / 2) as u64)
    }
}

pub fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

pub fn router(llm: Arc<FakeLlm>, store: Arc<FakeStore>) -> OperationRouter {
    OperationRouter::new(
        SchemaDocument::from_text(TEST_SCHEMA).unwrap(),
        llm,
        store,
    )
}
