mod anthropic;
mod factory;
mod fallback;
mod ollama;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_chat_prompt, HOMECHEF_SYSTEM_PROMPT, SUGGESTION_SYSTEM_PROMPT};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// A single turn in a chat exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Unified trait for all chat-completion providers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Send a conversation and return the assistant's reply text
    async fn chat(
        &self,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, Box<dyn Error>>;
}
