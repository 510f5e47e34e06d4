//! Ingredient matching heuristics.
//!
//! Recipes store ingredients as free text, one item per line ("2 cups whole
//! milk"), while the pantry holds bare ingredient names. Matching the two
//! goes through a normalization step and a last-token comparison key.

use std::collections::HashSet;

/// Normalize a free-text ingredient line into a comparison form.
///
/// Lower-cases the line, replaces common list punctuation with spaces, drops
/// tokens that are purely numeric, and rejoins the remaining tokens with
/// single spaces. Never fails: empty or all-numeric input yields an empty
/// string, and normalizing an already-normalized string is a no-op.
pub fn normalize(line: &str) -> String {
    let lowered = line.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| match c {
            ',' | '.' | ';' | ':' | '(' | ')' => ' ',
            other => other,
        })
        .collect();

    stripped
        .split_whitespace()
        .filter(|token| !token.chars().all(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key for an ingredient line: the last token of its normalized
/// form, on the assumption that the final word is the significant noun
/// ("2 cups whole milk" keys as "milk").
///
/// Multi-word ingredient names key on their last word only, so "red pepper
/// flakes" keys as "flakes" and will not match a pantry entry of "pepper".
/// This imprecision is part of the matching contract; pantry data written by
/// earlier releases depends on it.
pub fn ingredient_key(line: &str) -> String {
    normalize(line)
        .rsplit(' ')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Compute which of a recipe's ingredient lines are not covered by the
/// pantry.
///
/// Pantry entries are expected in stored form (trimmed and lower-cased); the
/// last-token heuristic is applied to the recipe lines only, never to the
/// pantry. Blank lines and lines that normalize to nothing are skipped. The
/// result preserves first-occurrence order and removes duplicate keys.
pub fn missing_ingredients<'a, I>(lines: I, pantry: &HashSet<String>) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut missing = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let key = ingredient_key(line);
        if key.is_empty() || pantry.contains(&key) {
            continue;
        }
        if seen.insert(key.clone()) {
            missing.push(key);
        }
    }

    missing
}
