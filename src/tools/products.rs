//! Product lookup tools
//!
//! Fetch candidate products for each ingredient from the chosen source.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Product;
use crate::sources::ProductSource;

/// Response for fetch_products
#[derive(Debug, Serialize)]
pub struct FetchProductsResponse {
    pub source: &'static str,
    /// Ingredient name → candidate products (empty when nothing matched)
    pub products: BTreeMap<String, Vec<Product>>,
    /// Ingredients whose lookup failed
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

/// Look up candidates for every ingredient.
///
/// A failed lookup leaves that ingredient with no candidates; the others
/// still come back.
pub async fn fetch_products(
    source: &dyn ProductSource,
    ingredients: &[String],
    limit: usize,
) -> Result<FetchProductsResponse, String> {
    let names: Vec<&str> = ingredients
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect();

    if names.is_empty() {
        return Err("At least one ingredient name is required".to_string());
    }
    if limit == 0 {
        return Err("limit must be greater than 0".to_string());
    }

    let mut products = BTreeMap::new();
    let mut errors = BTreeMap::new();

    for name in names {
        match source.search(name, limit).await {
            Ok(found) => {
                tracing::info!("{}: {} candidates for '{}'", source.name(), found.len(), name);
                products.insert(name.to_string(), found);
            }
            Err(e) => {
                tracing::warn!("{} lookup for '{}' failed: {}", source.name(), name, e);
                products.insert(name.to_string(), Vec::new());
                errors.insert(name.to_string(), e.to_string());
            }
        }
    }

    Ok(FetchProductsResponse {
        source: source.name(),
        products,
        errors,
    })
}
