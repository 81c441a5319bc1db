//! Recipe dataset search
//!
//! Recipes are filtered by title and by allergens mentioned anywhere in the
//! ingredient text. Only the first `scan_limit` recipes are considered.

use serde::Serialize;

use super::parser::parse_ingredient;
use crate::db::{Database, DbResult};
use crate::models::Recipe;

/// One row of the ingredient list shown for a recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientRow {
    pub ingredient_text: String,
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

/// Keep recipes whose title contains `name` and whose ingredients mention
/// none of the allergens. Both checks ignore case; blank allergens are dropped.
pub fn filter_recipes<S: AsRef<str>>(recipes: Vec<Recipe>, name: &str, allergens: &[S]) -> Vec<Recipe> {
    let name = name.trim().to_lowercase();
    let allergens: Vec<String> = allergens
        .iter()
        .map(|a| a.as_ref().trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect();

    recipes
        .into_iter()
        .filter(|recipe| name.is_empty() || recipe.title.to_lowercase().contains(&name))
        .filter(|recipe| {
            let ingredients = recipe.ingredients_text().to_lowercase();
            !allergens.iter().any(|a| ingredients.contains(a.as_str()))
        })
        .collect()
}

/// Pair each ingredient line with its extracted name.
///
/// The quantity and unit come from parsing the line itself; the name comes
/// from the dataset's NER list when it has one for that position.
pub fn ingredient_rows(recipe: &Recipe) -> Vec<IngredientRow> {
    recipe
        .ingredients
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let parsed = parse_ingredient(line);
            let name = recipe
                .ner
                .get(i)
                .cloned()
                .unwrap_or_else(|| parsed.name.clone());
            IngredientRow {
                ingredient_text: line.clone(),
                name,
                quantity: parsed.quantity,
                unit: parsed.unit,
            }
        })
        .collect()
}

/// Read access to the recipe dataset
#[derive(Clone)]
pub struct RecipeStore {
    database: Database,
    scan_limit: i64,
}

impl RecipeStore {
    /// Store scanning at most `scan_limit` recipes per query
    pub fn new(database: Database, scan_limit: i64) -> Self {
        Self {
            database,
            scan_limit,
        }
    }

    /// Recipes matching a title fragment and free of the allergens
    pub fn search<S: AsRef<str>>(&self, name: &str, allergens: &[S]) -> DbResult<Vec<Recipe>> {
        let recipes = self.database.with_conn(|conn| Recipe::list(conn, self.scan_limit))?;
        let loaded = recipes.len();
        let filtered = filter_recipes(recipes, name, allergens);
        tracing::debug!(
            "Recipe search '{}': {} of {} scanned recipes kept",
            name,
            filtered.len(),
            loaded
        );
        Ok(filtered)
    }

    /// A recipe by exact title, unless it mentions one of the allergens
    pub fn find_by_title<S: AsRef<str>>(&self, title: &str, allergens: &[S]) -> DbResult<Option<Recipe>> {
        let recipe = self
            .search("", allergens)?
            .into_iter()
            .find(|r| r.title == title);
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i64, title: &str, ingredients: &[&str], ner: &[&str]) -> Recipe {
        Recipe {
            id,
            title: title.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            directions: vec![],
            ner: ner.iter().map(|s| s.to_string()).collect(),
            link: None,
        }
    }

    fn dataset() -> Vec<Recipe> {
        vec![
            recipe(1, "No-Bake Nut Cookies", &["1 c. sugar", "1/2 c. evaporated milk", "2 c. peanuts"], &[]),
            recipe(2, "Chicken Funny", &["1 large whole chicken", "2 (10 1/2 oz.) cans chicken gravy"], &[]),
            recipe(3, "Creamy Corn", &["2 (16 oz.) pkg. frozen corn", "1 (8 oz.) pkg. cream cheese"], &[]),
            recipe(4, "Chicken Stew", &["2 lb chicken", "4 c. milk"], &[]),
        ]
    }

    #[test]
    fn test_filter_by_name() {
        let found = filter_recipes(dataset(), "chicken", &[] as &[&str]);
        let ids: Vec<i64> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_filter_by_allergen() {
        let found = filter_recipes(dataset(), "", &["Milk", " "]);
        let ids: Vec<i64> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_filter_by_name_and_allergen() {
        let found = filter_recipes(dataset(), "Chicken", &["milk"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Chicken Funny");
    }

    #[test]
    fn test_ingredient_rows() {
        let r = recipe(1, "Toast", &["2 slices bread", "10 g butter"], &["bread"]);
        let rows = ingredient_rows(&r);
        assert_eq!(rows[0].name, "bread");
        assert_eq!(rows[0].quantity.as_deref(), Some("2"));
        assert_eq!(rows[0].unit.as_deref(), Some("slices"));
        // No NER entry for the second line, so the parsed name is used
        assert_eq!(rows[1].name, "butter");
        assert_eq!(rows[1].unit.as_deref(), Some("g"));
    }
}
