//! Completion service clients
//!
//! One trait ([`LlmClient`]) with a chat-completions implementation used for
//! Groq and OpenAI, and an Anthropic implementation. The backend is chosen
//! from configuration at startup.

pub mod anthropic_client;
pub mod backend;
pub mod llm_client;
pub mod openai_client;

use std::sync::Arc;

use tracing::info;

pub use anthropic_client::AnthropicClient;
pub use backend::LlmBackend;
pub use llm_client::{LlmClient, ToolCallResult, ToolDefinition, ToolResponse};
pub use openai_client::OpenAiClient;

use crate::config::LlmConfig;

/// Build the configured client
pub fn create_llm_client(config: &LlmConfig) -> Arc<dyn LlmClient> {
    let model = config.model();
    let client: Arc<dyn LlmClient> = match config.backend {
        LlmBackend::Groq => Arc::new(OpenAiClient::groq_with_model(config.api_key.clone(), model)),
        LlmBackend::OpenAi => Arc::new(OpenAiClient::openai_with_model(
            config.api_key.clone(),
            model,
        )),
        LlmBackend::Anthropic => {
            Arc::new(AnthropicClient::with_model(config.api_key.clone(), model))
        }
    };

    info!(
        "Using {} completion backend (model {})",
        client.provider_name(),
        client.model_name()
    );
    client
}
