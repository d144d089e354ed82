//! Capability selection
//!
//! When a prompt is not already SQL, the model picks which operation class
//! applies. This is one typed request: the four capabilities are offered as
//! tools, and the reply is either an invocation of one of them or a
//! free-text answer.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::error::{QueryError, QueryResult};
use crate::llm::{LlmClient, ToolCallResult, ToolDefinition, ToolResponse};
use crate::operation::{OperationKind, CAPABILITIES};

const AGENT_SYSTEM_PROMPT: &str = "You route requests against a relational database. \
Answer the user's request by calling exactly one of the provided tools: \
select to read rows, create to insert rows, update to change rows, delete to remove rows. \
Pass the user's request as the tool's `input`. \
If no tool applies, reply in plain text instead.";

/// What the model decided for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentDecision {
    /// Run this capability
    Invoke {
        capability: OperationKind,
        /// Free-text argument the model supplied
        input: String,
    },
    /// The model answered without invoking a capability
    Answer(String),
}

/// Offers the CRUD capabilities to the model and decodes its choice
#[derive(Clone)]
pub struct CapabilitySelector {
    llm: Arc<dyn LlmClient>,
    tools: Vec<ToolDefinition>,
}

impl CapabilitySelector {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            tools: capability_tools(),
        }
    }

    /// Ask the model which capability handles `prompt`
    pub async fn decide(&self, prompt: &str) -> QueryResult<AgentDecision> {
        let response = self
            .llm
            .chat_with_tools(AGENT_SYSTEM_PROMPT, prompt, &self.tools)
            .await
            .map_err(QueryError::completion)?;

        let decision = match response {
            ToolResponse::ToolCall(call) => decode_tool_call(call, prompt)?,
            ToolResponse::Text(text) => AgentDecision::Answer(text),
        };

        match &decision {
            AgentDecision::Invoke { capability, input } => {
                info!("Agent selected capability '{}'", capability);
                debug!("Agent capability input: {}", input);
            }
            AgentDecision::Answer(_) => info!("Agent answered without a capability"),
        }
        Ok(decision)
    }
}

/// One tool per capability, each taking a single free-text `input`
pub fn capability_tools() -> Vec<ToolDefinition> {
    CAPABILITIES
        .iter()
        .filter_map(|kind| {
            let description = kind.spec().description?;
            Some(ToolDefinition {
                name: kind.name().to_string(),
                description: description.to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "input": {
                            "type": "string",
                            "description": "The natural-language request"
                        }
                    },
                    "required": ["input"]
                }),
            })
        })
        .collect()
}

fn decode_tool_call(call: ToolCallResult, prompt: &str) -> QueryResult<AgentDecision> {
    let capability = call
        .tool_name
        .parse::<OperationKind>()
        .map_err(QueryError::completion)?;

    let input = match &call.arguments {
        serde_json::Value::String(s) => s.clone(),
        value => value
            .get("input")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| prompt.to_string()),
    };

    Ok(AgentDecision::Invoke { capability, input })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptMessage;
    use anyhow::Result;
    use async_trait::async_trait;

    struct ScriptedLlm(ToolResponse);

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, _messages: &[PromptMessage]) -> Result<String> {
            anyhow::bail!("not used")
        }

        async fn chat_with_tools(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            tools: &[ToolDefinition],
        ) -> Result<ToolResponse> {
            assert_eq!(tools.len(), 4);
            Ok(self.0.clone())
        }

        fn model_name(&self) -> &str {
            "scripted"
        }

        fn provider_name(&self) -> &str {
            "Scripted"
        }
    }

    fn selector(response: ToolResponse) -> CapabilitySelector {
        CapabilitySelector::new(Arc::new(ScriptedLlm(response)))
    }

    fn call(name: &str, arguments: serde_json::Value) -> ToolResponse {
        ToolResponse::ToolCall(ToolCallResult {
            tool_name: name.to_string(),
            arguments,
        })
    }

    #[test]
    fn test_capability_tools() {
        let tools = capability_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["select", "create", "update", "delete"]);
        assert_eq!(
            tools[2].description,
            "UPDATE rows based on a natural-language prompt"
        );
        assert_eq!(tools[0].parameters["required"], json!(["input"]));
    }

    #[tokio::test]
    async fn test_decides_invocation() {
        let decision = selector(call("select", json!({"input": "restaurants in Chicago"})))
            .decide("show me all restaurants in Chicago")
            .await
            .unwrap();
        assert_eq!(
            decision,
            AgentDecision::Invoke {
                capability: OperationKind::Select,
                input: "restaurants in Chicago".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_bare_string_and_missing_arguments() {
        let decision = selector(call("delete", json!("old orders")))
            .decide("remove old orders")
            .await
            .unwrap();
        assert!(matches!(decision, AgentDecision::Invoke { ref input, .. } if input == "old orders"));

        let decision = selector(call("create", serde_json::Value::Null))
            .decide("add a user named Ada")
            .await
            .unwrap();
        assert!(
            matches!(decision, AgentDecision::Invoke { ref input, .. } if input == "add a user named Ada")
        );
    }

    #[tokio::test]
    async fn test_text_answer() {
        let decision = selector(ToolResponse::Text("Hello!".to_string()))
            .decide("hi")
            .await
            .unwrap();
        assert_eq!(decision, AgentDecision::Answer("Hello!".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_capability_is_completion_error() {
        let err = selector(call("drop_table", json!({})))
            .decide("drop everything")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "completion");
    }
}
