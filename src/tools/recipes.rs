//! Recipe MCP Tools
//!
//! Searching the recipe dataset and parsing user-entered recipes.

use serde::Serialize;

use crate::models::{CustomRecipe, ParsedIngredient, Recipe};
use crate::recipes::{ingredient_rows, parse_multiple_ingredients, parse_recipe_text, IngredientRow, RecipeStore};

/// Recipe summary for search results
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub ingredient_count: usize,
    pub link: Option<String>,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            ingredient_count: recipe.ingredients.len(),
            link: recipe.link.clone(),
        }
    }
}

/// Response for search_recipes
#[derive(Debug, Serialize)]
pub struct SearchRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub count: usize,
}

/// Full recipe with each ingredient line paired to its name
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub ingredients: Vec<IngredientRow>,
    pub directions: Vec<String>,
    pub link: Option<String>,
}

/// Response for parse_custom_recipe
#[derive(Debug, Serialize)]
pub struct ParseCustomRecipeResponse {
    pub recipe: CustomRecipe,
    pub ingredients: Vec<ParsedIngredient>,
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Recipes whose title contains `name` and whose ingredients avoid the allergens
pub fn search_recipes(store: &RecipeStore, name: &str, allergens: &[String]) -> Result<SearchRecipesResponse, String> {
    let recipes = store
        .search(name, allergens)
        .map_err(|e| format!("Database error: {}", e))?;

    let recipes: Vec<RecipeSummary> = recipes.iter().map(RecipeSummary::from).collect();
    let count = recipes.len();

    Ok(SearchRecipesResponse { recipes, count })
}

/// One recipe by exact title, with ingredient rows
pub fn get_recipe(store: &RecipeStore, title: &str, allergens: &[String]) -> Result<Option<RecipeDetail>, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Recipe title cannot be empty".to_string());
    }

    let recipe = store
        .find_by_title(title, allergens)
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(recipe.map(|recipe| RecipeDetail {
        ingredients: ingredient_rows(&recipe),
        id: recipe.id,
        title: recipe.title,
        directions: recipe.directions,
        link: recipe.link,
    }))
}

/// Parse a recipe typed by the user, either as one text block or as lines
pub fn parse_custom_recipe(text: Option<&str>, lines: &[String]) -> Result<ParseCustomRecipeResponse, String> {
    let (recipe, ingredients) = match text {
        Some(text) if !text.trim().is_empty() => parse_recipe_text(text),
        _ => parse_multiple_ingredients(lines),
    };

    if ingredients.is_empty() {
        return Err("No ingredients could be parsed".to_string());
    }

    Ok(ParseCustomRecipeResponse { recipe, ingredients })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::Database;
    use crate::models::RecipeCreate;

    fn store() -> RecipeStore {
        let database = Database::in_memory().unwrap();
        database
            .with_conn(|conn| {
                run_migrations(conn)?;
                for (title, ingredients, ner) in [
                    ("Peanut Butter Cookies", vec!["1 c. peanut butter", "1 c. sugar", "1 egg"], vec!["peanut butter", "sugar", "egg"]),
                    ("Sugar Cookies", vec!["2 cups flour", "1 cup sugar"], vec!["flour", "sugar"]),
                ] {
                    Recipe::create(
                        conn,
                        &RecipeCreate {
                            title: title.to_string(),
                            ingredients: ingredients.into_iter().map(String::from).collect(),
                            directions: vec!["Bake.".to_string()],
                            ner: ner.into_iter().map(String::from).collect(),
                            link: None,
                        },
                    )?;
                }
                Ok(())
            })
            .unwrap();
        RecipeStore::new(database, 300)
    }

    #[test]
    fn test_search_recipes_excludes_allergens() {
        let store = store();
        let all = search_recipes(&store, "cookies", &[]).unwrap();
        assert_eq!(all.count, 2);

        let safe = search_recipes(&store, "cookies", &["Peanut".to_string()]).unwrap();
        assert_eq!(safe.count, 1);
        assert_eq!(safe.recipes[0].title, "Sugar Cookies");
    }

    #[test]
    fn test_get_recipe() {
        let store = store();
        let detail = get_recipe(&store, "Sugar Cookies", &[]).unwrap().unwrap();
        assert_eq!(detail.ingredients.len(), 2);
        assert_eq!(detail.ingredients[0].name, "flour");
        assert_eq!(detail.ingredients[0].unit.as_deref(), Some("cups"));

        assert!(get_recipe(&store, "Peanut Butter Cookies", &["egg".to_string()]).unwrap().is_none());
        assert!(get_recipe(&store, "  ", &[]).is_err());
    }

    #[test]
    fn test_parse_custom_recipe() {
        let response = parse_custom_recipe(Some("2 cups flour\n\n1 tsp salt\n"), &[]).unwrap();
        assert_eq!(response.ingredients.len(), 2);
        assert_eq!(response.recipe.ner, "flour, salt");

        let response = parse_custom_recipe(None, &["3 eggs".to_string()]).unwrap();
        assert_eq!(response.ingredients[0].quantity.as_deref(), Some("3"));

        assert!(parse_custom_recipe(Some("   "), &[]).is_err());
    }
}
