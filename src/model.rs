use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A stored recipe. Ids are assigned by the store on insert and never change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    /// One ingredient per line, as entered
    pub ingredients_text: String,
    /// One step per line, as entered
    pub steps_text: String,
    /// Cook time in minutes
    pub cook_time: Option<i64>,
    pub difficulty: Option<String>,
    pub image_path: Option<String>,
    pub is_favorite: bool,
}

impl Recipe {
    /// Non-blank ingredient lines in display order
    pub fn ingredient_lines(&self) -> Vec<&str> {
        self.ingredients_text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}

/// Payload for inserting a new recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub ingredients_text: String,
    pub steps_text: String,
    pub cook_time: Option<i64>,
    pub difficulty: Option<String>,
    pub image_path: Option<String>,
}

/// An entry on the grocery list. Names are stored lower-cased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: i64,
    pub name: String,
    pub is_checked: bool,
}

/// Structured reply from a recipe-suggestion request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeSuggestions {
    /// Ids of local recipes the model judged a good match
    pub matches: Vec<i64>,
    /// Free-text recipe ideas when local matches are weak
    pub creative_suggestions: Vec<String>,
    /// Ingredient name mapped to suggested alternatives
    pub substitutions: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_lines_skips_blanks() {
        let recipe = Recipe {
            id: 1,
            title: "Test".to_string(),
            ingredients_text: "1 cup flour\n\n  \n2 eggs\n".to_string(),
            steps_text: String::new(),
            cook_time: None,
            difficulty: None,
            image_path: None,
            is_favorite: false,
        };

        assert_eq!(recipe.ingredient_lines(), vec!["1 cup flour", "2 eggs"]);
    }

    #[test]
    fn test_suggestions_default_is_empty() {
        let suggestions = RecipeSuggestions::default();
        assert!(suggestions.matches.is_empty());
        assert!(suggestions.creative_suggestions.is_empty());
        assert!(suggestions.substitutions.is_empty());
    }
}
