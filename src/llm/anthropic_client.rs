//! Anthropic Client
//!
//! LLM client implementation for Anthropic Claude API.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::llm_client::{LlmClient, ToolCallResult, ToolDefinition, ToolResponse};
use crate::prompt::{PromptMessage, Role};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Default Anthropic model
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Anthropic Claude API client
#[derive(Clone)]
pub struct AnthropicClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
}

impl AnthropicClient {
    /// Create with a specific model
    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
        }
    }

    /// System messages go to the top-level `system` field; the rest stay in order.
    fn completion_body(&self, messages: &[PromptMessage]) -> serde_json::Value {
        let system = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let turns: Vec<serde_json::Value> = messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| json!({"role": "user", "content": &m.content}))
            .collect();

        json!({
            "model": &self.model,
            "max_tokens": 4096,
            "temperature": 0,
            "system": system,
            "messages": turns
        })
    }

    fn tools_body(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tools: &[ToolDefinition],
    ) -> serde_json::Value {
        let tools: Vec<serde_json::Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "name": &t.name,
                    "description": &t.description,
                    "input_schema": &t.parameters
                })
            })
            .collect();

        json!({
            "model": &self.model,
            "max_tokens": 1024,
            "temperature": 0,
            "system": system_prompt,
            "messages": [{"role": "user", "content": user_prompt}],
            "tools": tools,
            "tool_choice": {"type": "auto"}
        })
    }

    /// Internal API call implementation
    async fn call_api(&self, body: &serde_json::Value) -> Result<ApiResponse> {
        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .context("Anthropic API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Anthropic API error {}: {}", status, body));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| anyhow!("Failed to parse Anthropic response: {}", e))
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

fn first_text(response: &ApiResponse) -> Option<String> {
    response.content.iter().find_map(|block| match block {
        ContentBlock::Text { text } => Some(text.clone()),
        _ => None,
    })
}

fn into_tool_response(response: ApiResponse) -> ToolResponse {
    let text = first_text(&response).unwrap_or_default();
    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::ToolUse { name, input } => Some(ToolResponse::ToolCall(ToolCallResult {
                tool_name: name,
                arguments: input,
            })),
            _ => None,
        })
        .unwrap_or(ToolResponse::Text(text))
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String> {
        let response = self.call_api(&self.completion_body(messages)).await?;
        first_text(&response).ok_or_else(|| anyhow!("Empty response from Anthropic"))
    }

    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<ToolResponse> {
        let body = self.tools_body(system_prompt, user_prompt, tools);
        let response = self.call_api(&body).await?;
        Ok(into_tool_response(response))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "Anthropic"
    }
}
