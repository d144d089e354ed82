//! LLM Client Trait
//!
//! Unified interface for completion providers (Groq, OpenAI, Anthropic).

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::prompt::PromptMessage;

/// Tool/function definition offered to the model
///
/// - OpenAI-compatible APIs: maps to `tools[].function`
/// - Anthropic: maps to `tools[]` with `input_schema`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool/function name (e.g., "select")
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the tool's parameters
    pub parameters: serde_json::Value,
}

/// Result from a tool/function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Name of the tool that was called
    pub tool_name: String,
    /// Structured arguments as JSON
    pub arguments: serde_json::Value,
}

/// What the model did when offered tools
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    /// The model invoked a tool. Only the first invocation is kept.
    ToolCall(ToolCallResult),
    /// The model answered in free text
    Text(String),
}

/// Unified LLM client interface
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Submit role-tagged messages, return the completion text
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String>;

    /// Offer tools and let the model either call one or answer in text
    ///
    /// - OpenAI-compatible: `tools` with `tool_choice: "auto"`
    /// - Anthropic: `tools` with `tool_choice: {"type": "auto"}`
    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<ToolResponse>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}
