//! Operation Router
//!
//! Entry point of the pipeline. A prompt that already reads as SQL takes the
//! fast path straight to the executor; anything else goes to the model for
//! capability selection, then through prompt building, completion,
//! extraction and execution for the chosen operation.
//!
//! Requests are independent: no state is kept between calls, and
//! concurrent calls are not serialized against each other.

use std::sync::Arc;

use tracing::{debug, info};

use crate::agent::{AgentDecision, CapabilitySelector};
use crate::error::{QueryError, QueryResult};
use crate::executor::{ExecutionResult, QueryExecutor, SqlStore};
use crate::extract::extract;
use crate::llm::LlmClient;
use crate::operation::{classify_literal_sql, ExecutionMode, OperationKind};
use crate::prompt::PromptBuilder;
use crate::response::RouteOutput;
use crate::schema::SchemaDocument;

/// Dispatches one prompt to exactly one operation
#[derive(Clone)]
pub struct OperationRouter {
    prompts: PromptBuilder,
    llm: Arc<dyn LlmClient>,
    selector: CapabilitySelector,
    executor: QueryExecutor,
}

impl OperationRouter {
    pub fn new(schema: SchemaDocument, llm: Arc<dyn LlmClient>, store: Arc<dyn SqlStore>) -> Self {
        Self {
            prompts: PromptBuilder::new(schema),
            selector: CapabilitySelector::new(Arc::clone(&llm)),
            llm,
            executor: QueryExecutor::new(store),
        }
    }

    /// Route one prompt. Pair with [`crate::response::normalize`] for the
    /// caller-facing envelope.
    pub async fn route(&self, prompt: &str) -> QueryResult<RouteOutput> {
        if prompt.trim().is_empty() {
            return Err(QueryError::prompt_required());
        }
        info!("PROMPT: {}", prompt);

        if let Some(mode) = classify_literal_sql(prompt) {
            debug!("Prompt is literal SQL, skipping completion service");
            return self.run_literal(prompt, mode).await.map(RouteOutput::Executed);
        }

        match self.selector.decide(prompt).await? {
            AgentDecision::Invoke { capability, .. } => self
                .run_operation(capability, prompt)
                .await
                .map(RouteOutput::Executed),
            AgentDecision::Answer(text) => Ok(RouteOutput::AgentText(text)),
        }
    }

    /// Fast path: the caller's text is the statement.
    pub async fn run_literal(
        &self,
        prompt: &str,
        mode: ExecutionMode,
    ) -> QueryResult<ExecutionResult> {
        let sql = extract(prompt)?;
        info!("{} SQL: {}", OperationKind::Raw.name().to_uppercase(), sql);
        self.executor.execute(mode, sql).await
    }

    /// Generation path for one capability: prompt, complete, extract, execute.
    pub async fn run_operation(
        &self,
        kind: OperationKind,
        user_text: &str,
    ) -> QueryResult<ExecutionResult> {
        let spec = kind.spec();
        let mode = spec.mode.ok_or_else(|| {
            QueryError::Internal(format!("operation '{}' has no fixed execution mode", kind))
        })?;

        let messages = self.prompts.build(spec, user_text)?;
        let completion = self
            .llm
            .complete(&messages)
            .await
            .map_err(QueryError::completion)?;

        let sql = extract(&completion)?;
        info!("{} SQL: {}", kind.name().to_uppercase(), sql);
        self.executor.execute(mode, sql).await
    }
}
