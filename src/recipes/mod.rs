//! Recipes
//!
//! Ingredient-line parsing and the searchable recipe dataset.

pub mod dataset;
pub mod parser;

pub use dataset::{filter_recipes, ingredient_rows, IngredientRow, RecipeStore};
pub use parser::{parse_ingredient, parse_multiple_ingredients, parse_recipe_text};
