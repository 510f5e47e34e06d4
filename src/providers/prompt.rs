/// The system prompt that sets the assistant's cooking persona.
///
/// Loaded from `prompt.txt` at compile time using the `include_str!` macro,
/// making it easy to edit without dealing with Rust string syntax.
pub const HOMECHEF_SYSTEM_PROMPT: &str = include_str!("prompt.txt");

/// The system prompt for structured recipe-suggestion requests.
///
/// Instructs the model to match the user's ingredients against local recipe
/// titles and to reply with strict JSON (`matches`, `creative_suggestions`,
/// `substitutions`).
pub const SUGGESTION_SYSTEM_PROMPT: &str = include_str!("suggestion_prompt.txt");

/// Build the chat system prompt, optionally annotated with caller context
/// such as the currently open recipe.
pub fn build_chat_prompt(context: Option<&str>) -> String {
    match context.and_then(|ctx| {
        let trimmed = ctx.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }) {
        Some(ctx) => format!("{}\n\nContext: {}", HOMECHEF_SYSTEM_PROMPT.trim_end(), ctx),
        None => HOMECHEF_SYSTEM_PROMPT.to_string(),
    }
}
