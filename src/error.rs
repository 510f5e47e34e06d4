use thiserror::Error;

/// Errors that can occur during recipe, pantry, and assistant operations
#[derive(Error, Debug)]
pub enum HomeChefError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request to a chat provider failed
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Chat provider returned an unusable response
    #[error("Chat error: {0}")]
    Chat(String),

    /// Recipe id not present in the store
    #[error("Recipe {0} not found")]
    RecipeNotFound(i64),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
