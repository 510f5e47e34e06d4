use crate::config::ProviderConfig;
use crate::providers::{ChatMessage, ChatProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;

/// Provider for a locally running Ollama server. No API key required.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

impl OllamaProvider {
    /// Create a new Ollama provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, Box<dyn Error>> {
        let base_url = config
            .base_url
            .clone()
            .or_else(|| std::env::var("OLLAMA_HOST").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OllamaProvider {
            client: Client::new(),
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, model: String) -> Self {
        OllamaProvider {
            client: Client::new(),
            base_url,
            model,
            temperature: 0.4,
        }
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
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
            .post(format!("{}/api/chat", self.base_url))
            .json(&json!({
                "model": self.model,
                "messages": payload_messages,
                "stream": false,
                "options": {
                    "temperature": self.temperature
                }
            }))
            .send()
            .await?;

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let reply = response_body["message"]["content"]
            .as_str()
            .ok_or("Failed to extract content from Ollama response")?
            .to_string();

        Ok(reply)
    }
}
