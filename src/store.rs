use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::HomeChefError;
use crate::matcher;
use crate::model::{GroceryItem, NewRecipe, Recipe};

/// SQLite-backed store for recipes, the pantry, the grocery list, and
/// per-recipe notes. Single synchronous connection; callers sequence their
/// own access.
pub struct RecipeStore {
    conn: Connection,
}

impl RecipeStore {
    /// Open (or create) the database at `path`, creating the schema and
    /// seeding sample recipes on first use.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HomeChefError> {
        debug!("Opening recipe database at {}", path.as_ref().display());
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self, HomeChefError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, HomeChefError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let store = RecipeStore { conn };
        store.init_schema()?;
        store.seed_sample_recipes_if_empty()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), HomeChefError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                ingredients_text TEXT NOT NULL,
                steps_text TEXT NOT NULL,
                cook_time INTEGER,
                difficulty TEXT,
                image_path TEXT,
                is_favorite INTEGER DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS pantry_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL
            );
            CREATE TABLE IF NOT EXISTS grocery_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                is_checked INTEGER DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS recipe_notes (
                recipe_id INTEGER PRIMARY KEY,
                notes_text TEXT
            );",
        )?;
        Ok(())
    }

    fn seed_sample_recipes_if_empty(&self) -> Result<(), HomeChefError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let samples = [
            (
                "Simple Crepes",
                "1 cup flour\n2 eggs\n1/2 cup milk\n1/2 cup water\nPinch of salt\n1 tbsp butter",
                "1) Whisk flour and eggs.\n\
                 2) Gradually add milk and water while whisking.\n\
                 3) Add salt and melted butter; whisk until smooth.\n\
                 4) Heat a lightly oiled pan, pour batter, cook each side 1-2 minutes.",
                20i64,
            ),
            (
                "Pasta Aglio e Olio",
                "200g spaghetti\n3 cloves garlic\n4 tbsp olive oil\nRed pepper flakes\nSalt\nParsley",
                "1) Cook spaghetti until al dente.\n\
                 2) Gently cook sliced garlic in olive oil; add pepper flakes.\n\
                 3) Toss pasta with oil, season with salt, finish with parsley.",
                15,
            ),
            (
                "Veggie Omelette",
                "3 eggs\n1/4 cup milk\n1/4 cup diced bell pepper\n1/4 cup diced onion\nSalt\nPepper\nOlive oil",
                "1) Whisk eggs with milk, salt, pepper.\n\
                 2) Saut\u{e9} peppers and onions in oil.\n\
                 3) Pour eggs, cook until set; fold and serve.",
                10,
            ),
        ];

        for (title, ingredients, steps, cook_time) in samples {
            self.conn.execute(
                "INSERT INTO recipes (title, ingredients_text, steps_text, cook_time, difficulty, image_path)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![title, ingredients, steps, cook_time, "Easy", None::<String>],
            )?;
        }
        info!("Seeded {} sample recipes", samples.len());
        Ok(())
    }

    fn recipe_from_row(row: &Row<'_>) -> rusqlite::Result<Recipe> {
        Ok(Recipe {
            id: row.get("id")?,
            title: row.get("title")?,
            ingredients_text: row.get("ingredients_text")?,
            steps_text: row.get("steps_text")?,
            cook_time: row.get("cook_time")?,
            difficulty: row.get("difficulty")?,
            image_path: row.get("image_path")?,
            is_favorite: row.get::<_, i64>("is_favorite")? != 0,
        })
    }

    /// List recipes ordered by title, optionally filtered by a
    /// case-insensitive search over title and ingredients.
    pub fn list_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>, HomeChefError> {
        let rows = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(query) => {
                let like = format!("%{}%", query.to_lowercase());
                let mut stmt = self.conn.prepare(
                    "SELECT * FROM recipes
                     WHERE LOWER(title) LIKE ?1 OR LOWER(ingredients_text) LIKE ?1
                     ORDER BY title ASC",
                )?;
                let mapped = stmt.query_map(params![like], Self::recipe_from_row)?;
                mapped.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT * FROM recipes ORDER BY title ASC")?;
                let mapped = stmt.query_map([], Self::recipe_from_row)?;
                mapped.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(rows)
    }

    /// Insert a new recipe and return its id.
    pub fn add_recipe(&self, recipe: &NewRecipe) -> Result<i64, HomeChefError> {
        self.conn.execute(
            "INSERT INTO recipes (title, ingredients_text, steps_text, cook_time, difficulty, image_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                recipe.title.trim(),
                recipe.ingredients_text.trim(),
                recipe.steps_text.trim(),
                recipe.cook_time,
                recipe.difficulty.as_deref().filter(|s| !s.is_empty()),
                recipe.image_path.as_deref().filter(|s| !s.is_empty()),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_recipe(&self, recipe_id: i64) -> Result<Option<Recipe>, HomeChefError> {
        let recipe = self
            .conn
            .query_row(
                "SELECT * FROM recipes WHERE id = ?1",
                params![recipe_id],
                Self::recipe_from_row,
            )
            .optional()?;
        Ok(recipe)
    }

    pub fn set_favorite(&self, recipe_id: i64, is_favorite: bool) -> Result<(), HomeChefError> {
        self.conn.execute(
            "UPDATE recipes SET is_favorite = ?1 WHERE id = ?2",
            params![is_favorite as i64, recipe_id],
        )?;
        Ok(())
    }

    pub fn list_favorites(&self) -> Result<Vec<Recipe>, HomeChefError> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM recipes WHERE is_favorite = 1 ORDER BY title ASC")?;
        let mapped = stmt.query_map([], Self::recipe_from_row)?;
        Ok(mapped.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete a recipe together with its notes.
    pub fn delete_recipe(&self, recipe_id: i64) -> Result<(), HomeChefError> {
        self.conn.execute(
            "DELETE FROM recipe_notes WHERE recipe_id = ?1",
            params![recipe_id],
        )?;
        self.conn
            .execute("DELETE FROM recipes WHERE id = ?1", params![recipe_id])?;
        Ok(())
    }

    /// Pantry entry names in alphabetical order, in stored (trimmed,
    /// lower-cased) form.
    pub fn list_pantry(&self) -> Result<Vec<String>, HomeChefError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pantry_items ORDER BY name ASC")?;
        let mapped = stmt.query_map([], |row| row.get(0))?;
        Ok(mapped.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Add a pantry entry. Names are trimmed and lower-cased before insert;
    /// duplicates and blank names are ignored.
    pub fn add_pantry_item(&self, name: &str) -> Result<(), HomeChefError> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Ok(());
        }
        self.conn.execute(
            "INSERT OR IGNORE INTO pantry_items (name) VALUES (?1)",
            params![name],
        )?;
        Ok(())
    }

    pub fn remove_pantry_item(&self, name: &str) -> Result<(), HomeChefError> {
        self.conn.execute(
            "DELETE FROM pantry_items WHERE name = ?1",
            params![name.trim().to_lowercase()],
        )?;
        Ok(())
    }

    fn pantry_set(&self) -> Result<HashSet<String>, HomeChefError> {
        Ok(self.list_pantry()?.into_iter().collect())
    }

    pub fn list_grocery(&self) -> Result<Vec<GroceryItem>, HomeChefError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, is_checked FROM grocery_items ORDER BY name ASC")?;
        let mapped = stmt.query_map([], |row| {
            Ok(GroceryItem {
                id: row.get("id")?,
                name: row.get("name")?,
                is_checked: row.get::<_, i64>("is_checked")? != 0,
            })
        })?;
        Ok(mapped.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Add a grocery item, stored lower-cased and unchecked. Blank names are
    /// ignored.
    pub fn add_grocery_item(&self, name: &str) -> Result<(), HomeChefError> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Ok(());
        }
        self.conn.execute(
            "INSERT INTO grocery_items (name, is_checked) VALUES (?1, 0)",
            params![name],
        )?;
        Ok(())
    }

    pub fn remove_grocery_item(&self, item_id: i64) -> Result<(), HomeChefError> {
        self.conn
            .execute("DELETE FROM grocery_items WHERE id = ?1", params![item_id])?;
        Ok(())
    }

    pub fn clear_grocery(&self) -> Result<(), HomeChefError> {
        self.conn.execute("DELETE FROM grocery_items", [])?;
        Ok(())
    }

    pub fn set_grocery_checked(&self, item_id: i64, checked: bool) -> Result<(), HomeChefError> {
        self.conn.execute(
            "UPDATE grocery_items SET is_checked = ?1 WHERE id = ?2",
            params![checked as i64, item_id],
        )?;
        Ok(())
    }

    /// Render the grocery list as shareable text, one "[x] name" line per
    /// item.
    pub fn export_grocery_text(&self) -> Result<String, HomeChefError> {
        let lines: Vec<String> = self
            .list_grocery()?
            .into_iter()
            .map(|item| {
                format!(
                    "[{}] {}",
                    if item.is_checked { 'x' } else { ' ' },
                    item.name
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }

    /// Notes for a recipe; empty string when none have been saved.
    pub fn recipe_notes(&self, recipe_id: i64) -> Result<String, HomeChefError> {
        let notes: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT notes_text FROM recipe_notes WHERE recipe_id = ?1",
                params![recipe_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(notes.flatten().unwrap_or_default())
    }

    pub fn set_recipe_notes(&self, recipe_id: i64, notes_text: &str) -> Result<(), HomeChefError> {
        self.conn.execute(
            "INSERT INTO recipe_notes (recipe_id, notes_text) VALUES (?1, ?2)
             ON CONFLICT(recipe_id) DO UPDATE SET notes_text = excluded.notes_text",
            params![recipe_id, notes_text],
        )?;
        Ok(())
    }

    /// Compute which of a recipe's ingredients are missing from the pantry.
    /// Unknown recipe ids yield an empty list.
    pub fn missing_ingredients(&self, recipe_id: i64) -> Result<Vec<String>, HomeChefError> {
        let Some(recipe) = self.get_recipe(recipe_id)? else {
            return Ok(Vec::new());
        };
        let pantry = self.pantry_set()?;
        Ok(matcher::missing_ingredients(
            recipe.ingredient_lines(),
            &pantry,
        ))
    }

    /// Append each of a recipe's missing ingredients to the grocery list and
    /// return them.
    pub fn add_missing_to_grocery(&self, recipe_id: i64) -> Result<Vec<String>, HomeChefError> {
        let missing = self.missing_ingredients(recipe_id)?;
        for name in &missing {
            self.add_grocery_item(name)?;
        }
        Ok(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecipeStore {
        RecipeStore::open_in_memory().unwrap()
    }

    fn find_by_title(store: &RecipeStore, title: &str) -> Recipe {
        store
            .list_recipes(Some(title))
            .unwrap()
            .into_iter()
            .find(|r| r.title == title)
            .unwrap()
    }

    #[test]
    fn test_open_seeds_sample_recipes_once() {
        let store = store();
        let recipes = store.list_recipes(None).unwrap();
        assert_eq!(recipes.len(), 3);
        // ordered by title
        assert_eq!(recipes[0].title, "Pasta Aglio e Olio");
        assert_eq!(recipes[1].title, "Simple Crepes");
        assert_eq!(recipes[2].title, "Veggie Omelette");
    }

    #[test]
    fn test_add_and_get_recipe() {
        let store = store();
        let id = store
            .add_recipe(&NewRecipe {
                title: "  Toast  ".to_string(),
                ingredients_text: "2 slices bread\nbutter".to_string(),
                steps_text: "1) Toast the bread.\n2) Butter it.".to_string(),
                cook_time: Some(5),
                difficulty: Some("Easy".to_string()),
                image_path: None,
            })
            .unwrap();

        let recipe = store.get_recipe(id).unwrap().unwrap();
        assert_eq!(recipe.title, "Toast");
        assert_eq!(recipe.cook_time, Some(5));
        assert!(!recipe.is_favorite);
        assert!(store.get_recipe(9999).unwrap().is_none());
    }

    #[test]
    fn test_search_matches_title_and_ingredients() {
        let store = store();
        let by_title = store.list_recipes(Some("crepes")).unwrap();
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Simple Crepes");

        // "spaghetti" only appears in the ingredient text
        let by_ingredient = store.list_recipes(Some("SPAGHETTI")).unwrap();
        assert_eq!(by_ingredient.len(), 1);
        assert_eq!(by_ingredient[0].title, "Pasta Aglio e Olio");

        assert!(store.list_recipes(Some("no such dish")).unwrap().is_empty());
    }

    #[test]
    fn test_favorites_roundtrip() {
        let store = store();
        let crepes = find_by_title(&store, "Simple Crepes");

        store.set_favorite(crepes.id, true).unwrap();
        let favorites = store.list_favorites().unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, crepes.id);

        store.set_favorite(crepes.id, false).unwrap();
        assert!(store.list_favorites().unwrap().is_empty());
    }

    #[test]
    fn test_delete_recipe_removes_notes() {
        let store = store();
        let crepes = find_by_title(&store, "Simple Crepes");
        store.set_recipe_notes(crepes.id, "less butter").unwrap();

        store.delete_recipe(crepes.id).unwrap();
        assert!(store.get_recipe(crepes.id).unwrap().is_none());
        assert_eq!(store.recipe_notes(crepes.id).unwrap(), "");
    }

    #[test]
    fn test_pantry_is_unique_case_insensitive() {
        let store = store();
        store.add_pantry_item("Milk").unwrap();
        store.add_pantry_item("  milk  ").unwrap();
        store.add_pantry_item("MILK").unwrap();
        store.add_pantry_item("").unwrap();
        store.add_pantry_item("   ").unwrap();

        assert_eq!(store.list_pantry().unwrap(), vec!["milk"]);

        store.remove_pantry_item(" MILK ").unwrap();
        assert!(store.list_pantry().unwrap().is_empty());
    }

    #[test]
    fn test_grocery_flow_and_export() {
        let store = store();
        store.add_grocery_item("Butter").unwrap();
        store.add_grocery_item("apples").unwrap();
        store.add_grocery_item("").unwrap();

        let items = store.list_grocery().unwrap();
        assert_eq!(items.len(), 2);
        // ordered by name, stored lower-cased
        assert_eq!(items[0].name, "apples");
        assert_eq!(items[1].name, "butter");

        store.set_grocery_checked(items[0].id, true).unwrap();
        assert_eq!(
            store.export_grocery_text().unwrap(),
            "[x] apples\n[ ] butter"
        );

        store.remove_grocery_item(items[1].id).unwrap();
        assert_eq!(store.list_grocery().unwrap().len(), 1);

        store.clear_grocery().unwrap();
        assert!(store.list_grocery().unwrap().is_empty());
        assert_eq!(store.export_grocery_text().unwrap(), "");
    }

    #[test]
    fn test_notes_upsert() {
        let store = store();
        assert_eq!(store.recipe_notes(1).unwrap(), "");

        store.set_recipe_notes(1, "first draft").unwrap();
        assert_eq!(store.recipe_notes(1).unwrap(), "first draft");

        store.set_recipe_notes(1, "use brown butter").unwrap();
        assert_eq!(store.recipe_notes(1).unwrap(), "use brown butter");
    }

    #[test]
    fn test_missing_ingredients_against_pantry() {
        let store = store();
        let crepes = find_by_title(&store, "Simple Crepes");
        store.add_pantry_item("flour").unwrap();
        store.add_pantry_item("eggs").unwrap();

        let missing = store.missing_ingredients(crepes.id).unwrap();
        assert_eq!(missing, vec!["milk", "water", "salt", "butter"]);

        // unknown recipe ids are not an error
        assert!(store.missing_ingredients(9999).unwrap().is_empty());
    }

    #[test]
    fn test_add_missing_to_grocery() {
        let store = store();
        let crepes = find_by_title(&store, "Simple Crepes");
        store.add_pantry_item("flour").unwrap();
        store.add_pantry_item("eggs").unwrap();

        let missing = store.add_missing_to_grocery(crepes.id).unwrap();
        assert_eq!(missing, vec!["milk", "water", "salt", "butter"]);

        let grocery: Vec<String> = store
            .list_grocery()
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(grocery, vec!["butter", "milk", "salt", "water"]);
    }
}
