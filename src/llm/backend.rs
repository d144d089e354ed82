//! Backend Selection
//!
//! Enum for selecting between completion providers.

use std::str::FromStr;

use super::anthropic_client;
use super::openai_client::{DEFAULT_GROQ_MODEL, DEFAULT_OPENAI_MODEL};

/// LLM backend provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    /// Groq OpenAI-compatible API (default)
    #[default]
    Groq,
    /// OpenAI GPT
    OpenAi,
    /// Anthropic Claude
    Anthropic,
}

impl LlmBackend {
    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            LlmBackend::Groq => "Groq",
            LlmBackend::OpenAi => "OpenAI",
            LlmBackend::Anthropic => "Anthropic",
        }
    }

    /// Environment variable holding this backend's credential
    pub fn api_key_var(&self) -> &'static str {
        match self {
            LlmBackend::Groq => "GROQ_API_KEY",
            LlmBackend::OpenAi => "OPENAI_API_KEY",
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::Groq => DEFAULT_GROQ_MODEL,
            LlmBackend::OpenAi => DEFAULT_OPENAI_MODEL,
            LlmBackend::Anthropic => anthropic_client::DEFAULT_MODEL,
        }
    }
}

/// Error type for parsing LlmBackend
#[derive(Debug)]
pub struct ParseBackendError(String);

impl std::fmt::Display for ParseBackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseBackendError {}

impl FromStr for LlmBackend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(LlmBackend::Groq),
            "openai" | "gpt" => Ok(LlmBackend::OpenAi),
            "anthropic" | "claude" => Ok(LlmBackend::Anthropic),
            other => Err(ParseBackendError(format!(
                "Unknown LLM_BACKEND '{}'. Valid values: groq, openai, gpt, anthropic, claude",
                other
            ))),
        }
    }
}

impl std::fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
