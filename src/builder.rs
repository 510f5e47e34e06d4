use std::path::PathBuf;

use crate::assistant::ChefAssistant;
use crate::config::{AppConfig, ProviderConfig};
use crate::error::HomeChefError;
use crate::providers::{ChatProvider, FallbackProvider, ProviderFactory};
use crate::store::RecipeStore;

/// Selects which chat backend the assistant talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    /// Convert to the provider name string used by the factory
    pub fn as_str(&self) -> &str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = HomeChefError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "openai" | "openrouter" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(HomeChefError::InvalidInput(format!(
                "Unknown provider '{}'. Available: {}",
                other,
                ProviderFactory::available_providers().join(", ")
            ))),
        }
    }
}

/// Builder for configuring a [`HomeChef`] application handle
///
/// # Example
/// ```no_run
/// use homechef::HomeChef;
///
/// # fn main() -> Result<(), homechef::HomeChefError> {
/// let app = HomeChef::builder()
///     .db_path("my-recipes.db")
///     .build()?;
/// let recipes = app.store().list_recipes(None)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct HomeChefBuilder {
    db_path: Option<PathBuf>,
    in_memory: bool,
    provider: Option<ProviderKind>,
    api_key: Option<String>,
    model: Option<String>,
}

impl HomeChefBuilder {
    /// Set the database file path, overriding configuration
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Use an in-memory database (nothing is persisted)
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Set a specific chat provider instead of the configured default
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the chat provider directly instead of relying on
    /// configuration or environment variables
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the chat provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build the application handle: load configuration, open the database,
    /// and remember provider overrides for later assistant construction.
    ///
    /// # Errors
    /// Returns `HomeChefError` if both `db_path` and `in_memory` were
    /// requested, if configuration fails to load, or if the database cannot
    /// be opened.
    pub fn build(self) -> Result<HomeChef, HomeChefError> {
        if self.in_memory && self.db_path.is_some() {
            return Err(HomeChefError::Builder(
                "Cannot combine in_memory() with db_path()".to_string(),
            ));
        }

        let config = AppConfig::load()?;
        let store = if self.in_memory {
            RecipeStore::open_in_memory()?
        } else {
            let path = self
                .db_path
                .unwrap_or_else(|| PathBuf::from(&config.db_path));
            RecipeStore::open(path)?
        };

        Ok(HomeChef {
            store,
            config,
            provider_override: self.provider,
            api_key: self.api_key,
            model: self.model,
        })
    }
}

/// Application handle tying the recipe store to the chat configuration
pub struct HomeChef {
    store: RecipeStore,
    config: AppConfig,
    provider_override: Option<ProviderKind>,
    api_key: Option<String>,
    model: Option<String>,
}

impl HomeChef {
    /// Creates a new builder for the application handle
    pub fn builder() -> HomeChefBuilder {
        HomeChefBuilder::default()
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    /// Construct the cooking assistant on demand.
    ///
    /// Provider resolution order: explicit builder override, then the
    /// configured default provider, with a baseline configuration when the
    /// provider has no entry in the providers map. With fallback enabled and
    /// no override, the whole fallback chain is used.
    ///
    /// Commands that never talk to the model work without any provider being
    /// configured; this only fails when a chat feature is actually used.
    pub fn assistant(&self) -> Result<ChefAssistant, HomeChefError> {
        let name = self
            .provider_override
            .map(|kind| kind.as_str().to_string())
            .unwrap_or_else(|| self.config.default_provider.clone());

        let provider: Box<dyn ChatProvider> =
            if self.config.fallback.enabled && self.provider_override.is_none() {
                Box::new(
                    FallbackProvider::new(&self.config)
                        .map_err(|e| HomeChefError::Builder(e.to_string()))?,
                )
            } else {
                let mut provider_config = self
                    .config
                    .providers
                    .get(&name)
                    .cloned()
                    .unwrap_or_else(|| ProviderConfig::default_for(&name));
                if let Some(key) = &self.api_key {
                    provider_config.api_key = Some(key.clone());
                }
                if let Some(model) = &self.model {
                    provider_config.model = model.clone();
                }

                ProviderFactory::create(&name, &provider_config)
                    .map_err(|e| HomeChefError::Builder(e.to_string()))?
            };

        Ok(ChefAssistant::new(provider))
    }
}
