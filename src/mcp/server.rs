//! Recipewise MCP Server Implementation
//!
//! Exposes recipe search, product lookup and the allergen, nutrition and
//! impact analyses as MCP tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::allergens::AllergenMatcher;
use crate::config::Config;
use crate::db::Database;
use crate::models::{NutrientBasis, NutrientEntry, Product, SelectedProduct};
use crate::nutrition::{NutritionCalculator, Quantity};
use crate::recipes::RecipeStore;
use crate::sources::{CatalogClient, LocalFoodDb, ProductSource, SourceError, SourceKind};
use crate::tools::analysis::{self, Selection};
use crate::tools::products;
use crate::tools::recipes;
use crate::tools::status::StatusTracker;

/// Recipewise MCP Service
#[derive(Clone)]
pub struct RecipewiseService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    recipe_store: RecipeStore,
    catalog: Arc<CatalogClient>,
    local_db: LocalFoodDb,
    matcher: AllergenMatcher,
    calculator: NutritionCalculator,
    product_limit: usize,
    tool_router: ToolRouter<RecipewiseService>,
}

impl RecipewiseService {
    /// Build the service and its product sources from configuration
    pub fn new(config: &Config, database: Database) -> Result<Self, SourceError> {
        Ok(Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config.database_path.clone()))),
            recipe_store: RecipeStore::new(database.clone(), config.recipe_scan_limit),
            catalog: Arc::new(CatalogClient::new(config.catalog_url.clone())?),
            local_db: LocalFoodDb::new(database.clone()),
            matcher: AllergenMatcher::default(),
            calculator: NutritionCalculator::default(),
            product_limit: config.product_limit,
            database,
            tool_router: Self::tool_router(),
        })
    }

    fn source(&self, kind: SourceKind) -> &dyn ProductSource {
        match kind {
            SourceKind::OpenFoodFacts => self.catalog.as_ref(),
            SourceKind::LocalDb => &self.local_db,
        }
    }
}

/// Error body for a title that is missing or filtered out by allergens
fn recipe_not_found(title: &str) -> serde_json::Value {
    serde_json::json!({
        "error": "Recipe not found or contains a selected allergen",
        "title": title,
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRecipesParams {
    /// Title fragment; empty matches every recipe
    #[serde(default)]
    pub name: String,
    /// Allergens the ingredient lines must not mention
    #[serde(default)]
    pub allergens: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    pub title: String,
    #[serde(default)]
    pub allergens: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseCustomRecipeParams {
    /// Whole recipe, one ingredient per line
    pub text: Option<String>,
    /// Ingredient lines, used when `text` is absent
    #[serde(default)]
    pub ingredients: Vec<String>,
}

// ============================================================================
// Product Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FetchProductsParams {
    /// Ingredient names to look up
    pub ingredients: Vec<String>,
    /// "openfoodfacts" or "localdb"
    #[serde(default = "default_source")]
    pub source: String,
    pub limit: Option<usize>,
}

fn default_source() -> String {
    "openfoodfacts".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NutrientParams {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    /// "per_serving" (default) or "per_100g"
    pub basis: Option<String>,
}

/// A product as returned by fetch_products, plus an optional amount
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectedProductParams {
    #[serde(alias = "product_name", default)]
    pub name: String,
    /// Present for catalog products, absent for local database products
    pub allergens_hierarchy: Option<Vec<String>>,
    #[serde(default)]
    pub nutrients: Vec<NutrientParams>,
    pub serving_size: Option<String>,
    pub code: Option<String>,
    pub brands: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub environmental_data: BTreeMap<String, serde_json::Value>,
    /// Number, numeric string, or a list whose first element is used
    pub quantity: Option<serde_json::Value>,
    pub unit: Option<String>,
}

impl TryFrom<SelectedProductParams> for SelectedProduct {
    type Error = String;

    fn try_from(p: SelectedProductParams) -> Result<Self, Self::Error> {
        let quantity = p
            .quantity
            .map(serde_json::from_value::<Quantity>)
            .transpose()
            .map_err(|e| format!("Invalid quantity for '{}': {}", p.name, e))?;

        let nutrients = p
            .nutrients
            .into_iter()
            .map(|n| {
                let basis = match n.basis.as_deref() {
                    Some("per_100g") => NutrientBasis::Per100g,
                    _ => NutrientBasis::PerServing,
                };
                NutrientEntry::new(n.name, n.amount, n.unit, basis)
            })
            .collect();

        Ok(SelectedProduct {
            product: Product {
                name: p.name,
                allergens_hierarchy: p.allergens_hierarchy,
                nutrients,
                serving_size: p.serving_size,
                code: p.code,
                brands: p.brands,
                image_url: p.image_url,
                environmental_data: p.environmental_data,
            },
            quantity,
            unit: p.unit,
        })
    }
}

fn selection(products: BTreeMap<String, SelectedProductParams>) -> Result<Selection, McpError> {
    products
        .into_iter()
        .map(|(ingredient, p)| {
            SelectedProduct::try_from(p)
                .map(|selected| (ingredient, selected))
                .map_err(|e| McpError::invalid_params(e, None))
        })
        .collect()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckAllergensParams {
    /// Ingredient name → chosen product
    pub products: BTreeMap<String, SelectedProductParams>,
    pub allergens: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SelectionParams {
    /// Ingredient name → chosen product
    pub products: BTreeMap<String, SelectedProductParams>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl RecipewiseService {
    // --- Status ---

    #[tool(description = "Get the current status of the Recipewise service including build info, database contents, and process information")]
    async fn recipewise_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        to_json(&status)
    }

    #[tool(description = "Get step-by-step instructions for checking a recipe for allergens and nutrition. Call this first when unsure how the tools fit together.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::USAGE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Recipes ---

    #[tool(description = "Search recipes by title, excluding any whose ingredients mention the given allergens")]
    fn search_recipes(&self, Parameters(p): Parameters<SearchRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::search_recipes(&self.recipe_store, &p.name, &p.allergens)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a recipe by exact title with each ingredient line split into quantity, unit and name")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.recipe_store, &p.title, &p.allergens)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(recipe) => to_json(&recipe),
            None => to_json(&recipe_not_found(&p.title)),
        }
    }

    #[tool(description = "Parse a user-entered recipe into ingredient names, quantities and units")]
    fn parse_custom_recipe(&self, Parameters(p): Parameters<ParseCustomRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::parse_custom_recipe(p.text.as_deref(), &p.ingredients)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Products ---

    #[tool(description = "Fetch candidate products for each ingredient from Open Food Facts (source=openfoodfacts) or the local USDA database (source=localdb)")]
    async fn fetch_products(&self, Parameters(p): Parameters<FetchProductsParams>) -> Result<CallToolResult, McpError> {
        let kind = SourceKind::parse(&p.source).map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let limit = p.limit.unwrap_or(self.product_limit);
        let result = products::fetch_products(self.source(kind), &p.ingredients, limit)
            .await
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Analysis ---

    #[tool(description = "Check the chosen products for the user's allergens. Catalog products use their declared allergens; local products are matched by keyword.")]
    fn check_allergens(&self, Parameters(p): Parameters<CheckAllergensParams>) -> Result<CallToolResult, McpError> {
        let selection = selection(p.products)?;
        let result = analysis::check_allergens(&self.matcher, &selection, &p.allergens)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Total the tracked nutrients (Energy, Fat, Saturated Fat, Carbohydrates, Sugars, Fiber, Proteins, Salt, Sodium) over the chosen products")]
    fn calculate_nutrition(&self, Parameters(p): Parameters<SelectionParams>) -> Result<CallToolResult, McpError> {
        let selection = selection(p.products)?;
        let result = analysis::calculate_nutrition(&self.calculator, &selection)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Sum the numeric environmental impact figures of the chosen products")]
    fn calculate_environmental_impact(&self, Parameters(p): Parameters<SelectionParams>) -> Result<CallToolResult, McpError> {
        let selection = selection(p.products)?;
        let result = analysis::environmental_impact(&selection)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for RecipewiseService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "recipewise".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Recipewise".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Recipewise - recipe allergen and nutrition checks. \
                 Call usage_instructions first. \
                 Recipes: search_recipes, get_recipe, parse_custom_recipe. \
                 Products: fetch_products (source openfoodfacts or localdb). \
                 Analysis over ingredient → product selections: check_allergens, calculate_nutrition, \
                 calculate_environmental_impact. Status: recipewise_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selected_product_params_conversion() {
        let params: SelectedProductParams = serde_json::from_value(json!({
            "product_name": "Oat drink",
            "allergens_hierarchy": ["en:gluten"],
            "nutrients": [
                {"name": "Energy", "amount": 46, "unit": "kcal", "basis": "per_100g"},
                {"name": "Fat", "amount": 1.5, "unit": "g"}
            ],
            "serving_size": "250 ml",
            "quantity": ["2", "3"],
            "unit": "cup"
        }))
        .unwrap();

        let selected = SelectedProduct::try_from(params).unwrap();
        assert_eq!(selected.product.name, "Oat drink");
        assert_eq!(selected.product.nutrients[0].basis, NutrientBasis::Per100g);
        assert_eq!(selected.product.nutrients[1].basis, NutrientBasis::PerServing);
        assert_eq!(selected.quantity.unwrap().value().unwrap(), 2.0);
    }

    #[test]
    fn test_recipe_not_found_body_is_valid_json() {
        let title = "Pie \u{7f} \"deluxe\"\n";
        let text = serde_json::to_string_pretty(&recipe_not_found(title)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["title"], title);
        assert!(parsed["error"].as_str().unwrap().starts_with("Recipe not found"));
    }

    #[test]
    fn test_invalid_quantity_is_rejected() {
        let params: SelectedProductParams = serde_json::from_value(json!({
            "name": "Sugar",
            "quantity": {"amount": 2}
        }))
        .unwrap();
        assert!(SelectedProduct::try_from(params).is_err());
    }
}
