//! OpenAI-compatible Client
//!
//! LLM client for chat-completions APIs speaking the OpenAI wire format.
//! Used for both Groq (default backend) and OpenAI proper.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::llm_client::{LlmClient, ToolCallResult, ToolDefinition, ToolResponse};
use crate::prompt::PromptMessage;

const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default Groq model
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
/// Default OpenAI model
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Chat-completions API client
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    url: String,
    provider: &'static str,
}

impl OpenAiClient {
    pub fn groq_with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
            url: GROQ_URL.to_string(),
            provider: "Groq",
        }
    }

    pub fn openai_with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
            url: OPENAI_URL.to_string(),
            provider: "OpenAI",
        }
    }

    /// Point the client at another compatible endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn messages_json(messages: &[PromptMessage]) -> serde_json::Value {
        serde_json::Value::Array(
            messages
                .iter()
                .map(|m| json!({"role": m.role.as_str(), "content": &m.content}))
                .collect(),
        )
    }

    fn completion_body(&self, messages: &[PromptMessage]) -> serde_json::Value {
        json!({
            "model": &self.model,
            "messages": Self::messages_json(messages),
            "temperature": 0
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
                    "type": "function",
                    "function": {
                        "name": &t.name,
                        "description": &t.description,
                        "parameters": &t.parameters
                    }
                })
            })
            .collect();

        json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "temperature": 0,
            "tools": tools,
            "tool_choice": "auto"
        })
    }

    /// Internal API call implementation
    async fn call_api(&self, body: &serde_json::Value) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .with_context(|| format!("{} API request failed", self.provider))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{} API error {}: {}", self.provider, status, body));
        }

        let text = response.text().await?;
        tracing::debug!(
            "{} raw response: {}",
            self.provider,
            text.chars().take(1000).collect::<String>()
        );
        Ok(text)
    }
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    /// Arguments arrive as a JSON-encoded string
    arguments: String,
}
#[derive(Deserialize)]
struct ToolCall {
    function: FunctionCall,
}
#[derive(Deserialize)]
struct Message {
    content: Option<String>,
    /// Absent or `null` when the model answered in text
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}
#[derive(Deserialize)]
struct Choice {
    message: Message,
}
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

fn first_message(response_text: &str) -> Result<Message> {
    let api_response: ApiResponse = serde_json::from_str(response_text)
        .map_err(|e| anyhow!("Failed to parse completion response: {}", e))?;
    api_response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| anyhow!("Completion response had no choices"))
}

fn parse_completion(response_text: &str) -> Result<String> {
    first_message(response_text)?
        .content
        .ok_or_else(|| anyhow!("Completion response had no content"))
}

fn parse_tool_response(response_text: &str) -> Result<ToolResponse> {
    let message = first_message(response_text)?;

    if let Some(call) = message.tool_calls.into_iter().flatten().next() {
        let arguments: serde_json::Value = if call.function.arguments.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&call.function.arguments)
                .map_err(|e| anyhow!("Failed to parse function arguments: {}", e))?
        };
        return Ok(ToolResponse::ToolCall(ToolCallResult {
            tool_name: call.function.name,
            arguments,
        }));
    }

    Ok(ToolResponse::Text(message.content.unwrap_or_default()))
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String> {
        let text = self.call_api(&self.completion_body(messages)).await?;
        parse_completion(&text)
    }

    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<ToolResponse> {
        let body = self.tools_body(system_prompt, user_prompt, tools);
        let text = self.call_api(&body).await?;
        parse_tool_response(&text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        self.provider
    }
}
