use clap::{Parser, Subcommand};
use std::path::PathBuf;

use homechef::{HomeChef, HomeChefError, NewRecipe, ProviderKind, Recipe};

#[derive(Parser)]
#[command(name = "homechef")]
#[command(about = "Recipe manager with pantry tracking and AI cooking assistance")]
#[command(version)]
struct Cli {
    /// Path to the recipe database (overrides configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Chat provider for suggest/chat: openai, anthropic, ollama
    #[arg(long, global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipes, optionally filtered
    List {
        /// Case-insensitive search over titles and ingredients
        #[arg(long)]
        search: Option<String>,
        /// Only show favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Show a recipe with its ingredients, steps, and notes
    Show { id: i64 },

    /// Add a new recipe
    Add {
        #[arg(long)]
        title: String,
        /// Ingredients, one per line
        #[arg(long)]
        ingredients: String,
        /// Steps, one per line
        #[arg(long)]
        steps: String,
        /// Cook time in minutes
        #[arg(long)]
        cook_time: Option<i64>,
        #[arg(long)]
        difficulty: Option<String>,
        /// Path to a recipe image
        #[arg(long)]
        image: Option<String>,
    },

    /// Mark a recipe as favorite
    Favorite {
        id: i64,
        /// Remove the favorite mark instead
        #[arg(long)]
        unset: bool,
    },

    /// Delete a recipe and its notes
    Delete { id: i64 },

    /// Manage the pantry
    Pantry {
        #[command(subcommand)]
        action: PantryCommands,
    },

    /// Manage the grocery list
    Grocery {
        #[command(subcommand)]
        action: GroceryCommands,
    },

    /// Show which of a recipe's ingredients are missing from the pantry
    Missing { id: i64 },

    /// Add a recipe's missing ingredients to the grocery list
    Shop { id: i64 },

    /// Show or set notes for a recipe
    Notes {
        id: i64,
        /// Replace the notes with this text
        #[arg(long)]
        set: Option<String>,
    },

    /// Ask the assistant for recipe suggestions from available ingredients
    Suggest {
        /// Use these ingredients instead of the pantry (repeatable)
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
    },

    /// Chat with the cooking assistant
    Chat {
        message: String,
        /// Include this recipe as conversation context
        #[arg(long)]
        recipe: Option<i64>,
    },
}

#[derive(Subcommand)]
enum PantryCommands {
    /// List pantry items
    List,
    /// Add an item to the pantry
    Add { name: String },
    /// Remove an item from the pantry
    Remove { name: String },
}

#[derive(Subcommand)]
enum GroceryCommands {
    /// List grocery items
    List,
    /// Add an item to the grocery list
    Add { name: String },
    /// Mark an item as bought
    Check { id: i64 },
    /// Mark an item as not bought
    Uncheck { id: i64 },
    /// Remove an item from the grocery list
    Remove { id: i64 },
    /// Remove all items
    Clear,
    /// Print the list as shareable text
    Export,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), HomeChefError> {
    let mut builder = HomeChef::builder();
    if let Some(db) = cli.db {
        builder = builder.db_path(db);
    }
    if let Some(provider) = cli.provider.as_deref() {
        builder = builder.provider(provider.parse::<ProviderKind>()?);
    }
    let app = builder.build()?;

    match cli.command {
        Commands::List { search, favorites } => {
            let recipes = if favorites {
                app.store().list_favorites()?
            } else {
                app.store().list_recipes(search.as_deref())?
            };
            if recipes.is_empty() {
                println!("No recipes found.");
            }
            for recipe in recipes {
                println!("{}", format_recipe_line(&recipe));
            }
        }

        Commands::Show { id } => {
            let recipe = app
                .store()
                .get_recipe(id)?
                .ok_or(HomeChefError::RecipeNotFound(id))?;
            print_recipe(&recipe);
            let notes = app.store().recipe_notes(id)?;
            if !notes.is_empty() {
                println!("\nNotes:\n{}", notes);
            }
        }

        Commands::Add {
            title,
            ingredients,
            steps,
            cook_time,
            difficulty,
            image,
        } => {
            if title.trim().is_empty() {
                return Err(HomeChefError::InvalidInput(
                    "Recipe title cannot be empty".to_string(),
                ));
            }
            let id = app.store().add_recipe(&NewRecipe {
                title,
                ingredients_text: ingredients,
                steps_text: steps,
                cook_time,
                difficulty,
                image_path: image,
            })?;
            println!("Added recipe {}", id);
        }

        Commands::Favorite { id, unset } => {
            ensure_recipe_exists(&app, id)?;
            app.store().set_favorite(id, !unset)?;
            println!(
                "Recipe {} {}",
                id,
                if unset {
                    "removed from favorites"
                } else {
                    "marked as favorite"
                }
            );
        }

        Commands::Delete { id } => {
            ensure_recipe_exists(&app, id)?;
            app.store().delete_recipe(id)?;
            println!("Deleted recipe {}", id);
        }

        Commands::Pantry { action } => match action {
            PantryCommands::List => {
                for name in app.store().list_pantry()? {
                    println!("{}", name);
                }
            }
            PantryCommands::Add { name } => {
                app.store().add_pantry_item(&name)?;
                println!("Added to pantry: {}", name.trim().to_lowercase());
            }
            PantryCommands::Remove { name } => {
                app.store().remove_pantry_item(&name)?;
                println!("Removed from pantry: {}", name.trim().to_lowercase());
            }
        },

        Commands::Grocery { action } => match action {
            GroceryCommands::List => {
                for item in app.store().list_grocery()? {
                    println!(
                        "{:>4}  [{}] {}",
                        item.id,
                        if item.is_checked { 'x' } else { ' ' },
                        item.name
                    );
                }
            }
            GroceryCommands::Add { name } => {
                app.store().add_grocery_item(&name)?;
                println!("Added to grocery list: {}", name.trim().to_lowercase());
            }
            GroceryCommands::Check { id } => {
                app.store().set_grocery_checked(id, true)?;
            }
            GroceryCommands::Uncheck { id } => {
                app.store().set_grocery_checked(id, false)?;
            }
            GroceryCommands::Remove { id } => {
                app.store().remove_grocery_item(id)?;
            }
            GroceryCommands::Clear => {
                app.store().clear_grocery()?;
                println!("Grocery list cleared.");
            }
            GroceryCommands::Export => {
                println!("{}", app.store().export_grocery_text()?);
            }
        },

        Commands::Missing { id } => {
            ensure_recipe_exists(&app, id)?;
            let missing = app.store().missing_ingredients(id)?;
            if missing.is_empty() {
                println!("Nothing missing - the pantry covers this recipe.");
            } else {
                println!("Missing: {}", missing.join(", "));
            }
        }

        Commands::Shop { id } => {
            ensure_recipe_exists(&app, id)?;
            let added = app.store().add_missing_to_grocery(id)?;
            if added.is_empty() {
                println!("Nothing missing - the pantry covers this recipe.");
            } else {
                println!("Added to grocery list: {}", added.join(", "));
            }
        }

        Commands::Notes { id, set } => {
            ensure_recipe_exists(&app, id)?;
            match set {
                Some(text) => {
                    app.store().set_recipe_notes(id, &text)?;
                    println!("Notes saved for recipe {}", id);
                }
                None => {
                    let notes = app.store().recipe_notes(id)?;
                    if notes.is_empty() {
                        println!("No notes for recipe {}", id);
                    } else {
                        println!("{}", notes);
                    }
                }
            }
        }

        Commands::Suggest { ingredients } => {
            let ingredients = if ingredients.is_empty() {
                app.store().list_pantry()?
            } else {
                ingredients
            };
            if ingredients.is_empty() {
                return Err(HomeChefError::InvalidInput(
                    "Pantry is empty; pass --ingredient or stock the pantry first".to_string(),
                ));
            }

            let recipes = app.store().list_recipes(None)?;
            let assistant = app.assistant()?;
            let suggestions = assistant.suggest_recipes(&ingredients, &recipes).await?;

            if suggestions.matches.is_empty()
                && suggestions.creative_suggestions.is_empty()
                && suggestions.substitutions.is_empty()
            {
                println!("No suggestions this time.");
                return Ok(());
            }

            if !suggestions.matches.is_empty() {
                println!("Matching recipes:");
                for id in &suggestions.matches {
                    if let Some(recipe) = app.store().get_recipe(*id)? {
                        println!("  {}", format_recipe_line(&recipe));
                    }
                }
            }
            if !suggestions.creative_suggestions.is_empty() {
                println!("Ideas:");
                for idea in &suggestions.creative_suggestions {
                    println!("  - {}", idea);
                }
            }
            if !suggestions.substitutions.is_empty() {
                println!("Substitutions:");
                for (ingredient, alternative) in &suggestions.substitutions {
                    println!("  {} -> {}", ingredient, alternative);
                }
            }
        }

        Commands::Chat { message, recipe } => {
            let context = match recipe {
                Some(id) => {
                    let recipe = app
                        .store()
                        .get_recipe(id)?
                        .ok_or(HomeChefError::RecipeNotFound(id))?;
                    Some(format!(
                        "Recipe: {}\nIngredients:\n{}\nSteps:\n{}",
                        recipe.title, recipe.ingredients_text, recipe.steps_text
                    ))
                }
                None => None,
            };

            let assistant = app.assistant()?;
            let reply = assistant.reply(&message, context.as_deref()).await?;
            println!("{}", reply);
        }
    }

    Ok(())
}

fn ensure_recipe_exists(app: &HomeChef, id: i64) -> Result<(), HomeChefError> {
    app.store()
        .get_recipe(id)?
        .map(|_| ())
        .ok_or(HomeChefError::RecipeNotFound(id))
}

fn format_recipe_line(recipe: &Recipe) -> String {
    let mut line = format!("{:>4}  {}", recipe.id, recipe.title);
    if let Some(minutes) = recipe.cook_time {
        line.push_str(&format!(" ({} min)", minutes));
    }
    if let Some(difficulty) = &recipe.difficulty {
        line.push_str(&format!(" [{}]", difficulty));
    }
    if recipe.is_favorite {
        line.push_str(" *");
    }
    line
}

fn print_recipe(recipe: &Recipe) {
    println!("{}", format_recipe_line(recipe));
    println!("\nIngredients:");
    for line in recipe.ingredient_lines() {
        println!("  {}", line);
    }
    println!("\nSteps:");
    for line in recipe.steps_text.lines().filter(|l| !l.trim().is_empty()) {
        println!("  {}", line);
    }
}
