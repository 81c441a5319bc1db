//! Ingredient-line parsing
//!
//! Splits free text such as "2 cups flour" into quantity, unit and name. The
//! unit is a guess (the word after a leading number); use
//! [`ParsedIngredient::validated_unit`] before converting it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{CustomRecipe, ParsedIngredient};

const CUSTOM_RECIPE_TITLE: &str = "Custom Recipe";
const CUSTOM_RECIPE_DIRECTIONS: &str = "Step 1: Mix all ingredients. Step 2: Cook as required.";

static NUMERIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)$").expect("valid quantity pattern"));

/// Split off the first whitespace-delimited token
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], &s[i..])),
        None => Some((s, "")),
    }
}

/// Parse a single ingredient line.
///
/// A blank line yields an empty name; callers drop those.
pub fn parse_ingredient(line: &str) -> ParsedIngredient {
    let mut quantity = None;
    let mut unit = None;
    let mut rest = line.trim();

    if let Some((token, after)) = next_token(rest) {
        if NUMERIC_TOKEN.is_match(token) {
            quantity = Some(token.to_string());
            rest = after;

            // Only a unit if something is left to be the name ("2 eggs" has no unit)
            if let Some((word, remainder)) = next_token(rest) {
                if word.chars().all(char::is_alphabetic) && !remainder.trim().is_empty() {
                    unit = Some(word.to_string());
                    rest = remainder;
                }
            }
        }
    }

    ParsedIngredient {
        ingredient_text: line.to_string(),
        name: rest.trim().to_string(),
        quantity,
        unit,
    }
}

/// Parse several lines, dropping those without a name, and build the
/// display projection of the resulting custom recipe.
pub fn parse_multiple_ingredients<I, S>(lines: I) -> (CustomRecipe, Vec<ParsedIngredient>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed: Vec<ParsedIngredient> = lines
        .into_iter()
        .map(|line| parse_ingredient(line.as_ref()))
        .filter(|ingredient| !ingredient.name.is_empty())
        .collect();

    let ner = parsed
        .iter()
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let ingredients = parsed
        .iter()
        .map(ParsedIngredient::display_line)
        .collect::<Vec<_>>()
        .join(", ");

    tracing::debug!("Parsed {} ingredient lines", parsed.len());

    let recipe = CustomRecipe {
        title: CUSTOM_RECIPE_TITLE.to_string(),
        directions: CUSTOM_RECIPE_DIRECTIONS.to_string(),
        ner,
        ingredients,
    };

    (recipe, parsed)
}

/// Parse a multi-line recipe text box
pub fn parse_recipe_text(text: &str) -> (CustomRecipe, Vec<ParsedIngredient>) {
    parse_multiple_ingredients(text.trim().lines())
}
