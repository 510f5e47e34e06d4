use crate::config::AppConfig;
use crate::providers::{ChatMessage, ChatProvider, ProviderFactory};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;

pub struct FallbackProvider {
    providers: Vec<Box<dyn ChatProvider>>,
    retry_attempts: u32,
    retry_delay_ms: u64,
}

impl FallbackProvider {
    /// Create a new fallback provider from configuration
    pub fn new(config: &AppConfig) -> Result<Self, Box<dyn Error>> {
        if !config.fallback.enabled {
            // If fallback is disabled, just use the default provider
            let default_provider = ProviderFactory::get_default_provider(config)?;
            return Ok(FallbackProvider {
                providers: vec![default_provider],
                retry_attempts: 1,
                retry_delay_ms: 0,
            });
        }

        let mut providers = Vec::new();

        // Create providers in fallback order
        for provider_name in &config.fallback.order {
            if let Some(provider_config) = config.providers.get(provider_name) {
                if provider_config.enabled {
                    match ProviderFactory::create(provider_name, provider_config) {
                        Ok(provider) => {
                            info!("Added '{}' to fallback chain", provider_name);
                            providers.push(provider);
                        }
                        Err(e) => {
                            warn!("Failed to initialize provider '{}': {}", provider_name, e);
                        }
                    }
                }
            } else {
                warn!(
                    "Provider '{}' in fallback order not found in configuration",
                    provider_name
                );
            }
        }

        if providers.is_empty() {
            return Err("No providers available in fallback configuration".into());
        }

        Ok(FallbackProvider {
            providers,
            retry_attempts: config.fallback.retry_attempts,
            retry_delay_ms: config.fallback.retry_delay_ms,
        })
    }

    /// Try a provider with exponential backoff retry logic
    async fn try_provider_with_retry(
        &self,
        provider: &dyn ChatProvider,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, String> {
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!(
                "Attempting chat with {} (attempt {}/{})",
                provider.provider_name(),
                attempt,
                self.retry_attempts
            );

            let should_retry = {
                let result = provider.chat(system, messages).await;

                match result {
                    Ok(result) => {
                        info!(
                            "Got chat reply from {}",
                            provider.provider_name()
                        );
                        return Ok(result);
                    }
                    Err(e) => {
                        // Convert error to string immediately to avoid Send issues
                        let error_msg = format!("{}", e);

                        warn!(
                            "Provider {} failed (attempt {}/{}): {}",
                            provider.provider_name(),
                            attempt,
                            self.retry_attempts,
                            error_msg
                        );
                        last_error = Some(error_msg);
                        attempt < self.retry_attempts
                    }
                }
            };

            // Sleep only if we need to retry
            if should_retry {
                // Exponential backoff: delay increases with each attempt
                let delay = Duration::from_millis(self.retry_delay_ms * attempt as u64);
                debug!("Waiting {:?} before retry", delay);
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap())
    }
}

#[async_trait]
impl ChatProvider for FallbackProvider {
    fn provider_name(&self) -> &str {
        "fallback"
    }

    async fn chat(
        &self,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, Box<dyn Error>> {
        let mut all_errors: Vec<String> = Vec::new();

        for provider in &self.providers {
            match self
                .try_provider_with_retry(provider.as_ref(), system, messages)
                .await
            {
                Ok(result) => return Ok(result),
                Err(e) => {
                    all_errors.push(format!("{}: {}", provider.provider_name(), e));
                }
            }
        }

        Err(format!("All providers failed:\n{}", all_errors.join("\n")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FallbackConfig, ProviderConfig};
    use std::collections::HashMap;

    fn create_test_config_with_fallback() -> AppConfig {
        let mut providers = HashMap::new();
        providers.insert(
            "openai".to_string(),
            ProviderConfig {
                api_key: Some("test-key".to_string()),
                ..ProviderConfig::default()
            },
        );

        AppConfig {
            default_provider: "openai".to_string(),
            providers,
            fallback: FallbackConfig {
                enabled: true,
                order: vec!["openai".to_string()],
                retry_attempts: 3,
                retry_delay_ms: 100,
            },
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fallback_provider_creation() {
        let config = create_test_config_with_fallback();
        let fallback = FallbackProvider::new(&config);
        assert!(fallback.is_ok());
    }

    #[tokio::test]
    async fn test_fallback_provider_name() {
        let config = create_test_config_with_fallback();
        let fallback = FallbackProvider::new(&config).unwrap();
        assert_eq!(fallback.provider_name(), "fallback");
    }

    #[tokio::test]
    async fn test_fallback_disabled() {
        let mut config = create_test_config_with_fallback();
        config.fallback.enabled = false;

        let fallback = FallbackProvider::new(&config).unwrap();
        // With fallback disabled, only one provider should be in the list
        assert_eq!(fallback.providers.len(), 1);
        assert_eq!(fallback.retry_attempts, 1);
    }

    #[tokio::test]
    async fn test_fallback_no_providers() {
        let config = AppConfig {
            default_provider: "openai".to_string(),
            providers: HashMap::new(),
            fallback: FallbackConfig {
                enabled: true,
                order: vec!["openai".to_string()],
                retry_attempts: 3,
                retry_delay_ms: 100,
            },
            ..AppConfig::default()
        };

        let result = FallbackProvider::new(&config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("No providers available"));
        }
    }

    #[tokio::test]
    async fn test_fallback_multiple_providers() {
        let mut providers = HashMap::new();
        providers.insert(
            "openai".to_string(),
            ProviderConfig {
                api_key: Some("test-key-1".to_string()),
                ..ProviderConfig::default()
            },
        );
        providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                api_key: None,
                ..ProviderConfig::default_for("ollama")
            },
        );

        let config = AppConfig {
            default_provider: "openai".to_string(),
            providers,
            fallback: FallbackConfig {
                enabled: true,
                order: vec!["openai".to_string(), "ollama".to_string()],
                retry_attempts: 2,
                retry_delay_ms: 50,
            },
            ..AppConfig::default()
        };

        let fallback = FallbackProvider::new(&config).unwrap();
        assert_eq!(fallback.providers.len(), 2);
    }
}
