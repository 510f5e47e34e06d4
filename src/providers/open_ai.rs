use crate::config::ProviderConfig;
use crate::providers::{ChatMessage, ChatProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;

/// Provider for OpenAI-compatible chat-completion endpoints. The default
/// base URL points at OpenRouter, which speaks the same wire format.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api";

impl OpenAIProvider {
    /// Create a new OpenAI-compatible provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, Box<dyn Error>> {
        // Try config first, then fall back to environment variables
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or("OPENROUTER_API_KEY or OPENAI_API_KEY not found in config or environment")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Create a provider with simple parameters, using the default endpoint
    pub fn with_api_key(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), model)
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.4,
            max_tokens: 1024,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn chat(
        &self,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, Box<dyn Error>> {
        let mut payload_messages = vec![json!({"role": "system", "content": system})];
        for message in messages {
            payload_messages.push(json!({"role": message.role, "content": message.content}));
        }

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": payload_messages,
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);
        let reply = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("Failed to extract content from response")?
            .to_string();

        Ok(reply)
    }
}
