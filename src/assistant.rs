use std::collections::HashMap;

use log::{debug, warn};
use serde_json::{json, Value};

use crate::error::HomeChefError;
use crate::model::{Recipe, RecipeSuggestions};
use crate::providers::{build_chat_prompt, ChatMessage, ChatProvider, SUGGESTION_SYSTEM_PROMPT};

/// High-level cooking assistant over a chat provider. Stateless; each call
/// is an independent request/response exchange.
pub struct ChefAssistant {
    provider: Box<dyn ChatProvider>,
}

impl ChefAssistant {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        ChefAssistant { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Ask the model to match available ingredients against the local
    /// recipes and propose alternatives.
    ///
    /// The model replies with strict JSON; matched titles are mapped back to
    /// recipe ids and unknown titles dropped. A reply that fails to parse as
    /// JSON degrades to empty suggestions instead of an error, so a chatty
    /// model never breaks the caller.
    pub async fn suggest_recipes(
        &self,
        ingredients: &[String],
        local_recipes: &[Recipe],
    ) -> Result<RecipeSuggestions, HomeChefError> {
        let titles: Vec<&str> = local_recipes.iter().map(|r| r.title.as_str()).collect();
        let payload = json!({
            "ingredients": ingredients,
            "local_recipe_titles": titles,
        });

        let reply = self
            .provider
            .chat(
                SUGGESTION_SYSTEM_PROMPT,
                &[ChatMessage::user(payload.to_string())],
            )
            .await
            .map_err(|e| HomeChefError::Chat(e.to_string()))?;
        debug!("Suggestion reply: {}", reply);

        let parsed: Value = match serde_json::from_str(strip_code_fences(&reply)) {
            Ok(value) => value,
            Err(e) => {
                warn!("Suggestion reply was not valid JSON: {}", e);
                return Ok(RecipeSuggestions::default());
            }
        };

        let title_to_id: HashMap<&str, i64> = local_recipes
            .iter()
            .map(|r| (r.title.as_str(), r.id))
            .collect();

        let matches = parsed["matches"]
            .as_array()
            .map(|titles| {
                titles
                    .iter()
                    .filter_map(|title| title.as_str())
                    .filter_map(|title| title_to_id.get(title).copied())
                    .collect()
            })
            .unwrap_or_default();

        let creative_suggestions = parsed["creative_suggestions"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let substitutions = parsed["substitutions"]
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(RecipeSuggestions {
            matches,
            creative_suggestions,
            substitutions,
        })
    }

    /// One-shot conversational reply, optionally grounded in context such as
    /// the currently open recipe.
    pub async fn reply(
        &self,
        message: &str,
        context: Option<&str>,
    ) -> Result<String, HomeChefError> {
        let system = build_chat_prompt(context);
        self.provider
            .chat(&system, &[ChatMessage::user(message)])
            .await
            .map_err(|e| HomeChefError::Chat(e.to_string()))
    }
}

/// Models often wrap JSON replies in markdown code fences despite being told
/// not to; unwrap them before parsing.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    if let Some(inner) = trimmed.strip_prefix("```") {
        let inner = inner.strip_prefix("json").unwrap_or(inner);
        if let Some(inner) = inner.strip_suffix("```") {
            return inner.trim();
        }
    }
    trimmed
}
