//! Data models
//!
//! Request-scoped product records plus the rows stored in SQLite.

mod food;
mod ingredient;
mod product;
mod recipe;

pub use food::{Food, FoodNutrient, FoundationFoodsFile};
pub use ingredient::{CustomRecipe, ParsedIngredient};
pub use product::{NutrientBasis, NutrientEntry, Product, ProductKind, SelectedProduct};
pub use recipe::{Recipe, RecipeCreate};
