//! Open Food Facts catalog client
//!
//! Searches the public catalog by ingredient name and reduces each result to
//! a [`Product`] carrying its allergen hierarchy and the tracked nutrients.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{ProductSource, SourceError};
use crate::models::{NutrientBasis, NutrientEntry, Product};

/// Default catalog endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://world.openfoodfacts.org";

/// Catalog nutriment keys and the names used for them in totals
const CATALOG_NUTRIENTS: [(&str, &str); 9] = [
    ("energy-kcal", "Energy"),
    ("fat", "Fat"),
    ("saturated-fat", "Saturated Fat"),
    ("carbohydrates", "Carbohydrates"),
    ("sugars", "Sugars"),
    ("fiber", "Fiber"),
    ("proteins", "Proteins"),
    ("salt", "Salt"),
    ("sodium", "Sodium"),
];

/// Numbers in catalog payloads are sometimes sent as strings
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(product: &Value, key: &str) -> Option<String> {
    product
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Pull the tracked nutrients out of a catalog product.
///
/// The per-serving value is preferred; the per-100g value is the fallback.
pub fn extract_nutrients(product: &Value) -> Vec<NutrientEntry> {
    let Some(nutriments) = product.get("nutriments") else {
        return Vec::new();
    };

    CATALOG_NUTRIENTS
        .iter()
        .filter_map(|(key, name)| {
            let per_serving = nutriments.get(format!("{}_serving", key)).and_then(as_number);
            let per_100g = nutriments.get(format!("{}_100g", key)).and_then(as_number);

            let (amount, basis) = match (per_serving, per_100g) {
                (Some(amount), _) => (amount, NutrientBasis::PerServing),
                (None, Some(amount)) => (amount, NutrientBasis::Per100g),
                (None, None) => return None,
            };
            if amount < 0.0 {
                return None;
            }

            let unit = nutriments
                .get(format!("{}_unit", key))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| if *key == "energy-kcal" { "kcal" } else { "g" }.to_string());

            Some(NutrientEntry::new(*name, amount, unit, basis))
        })
        .collect()
}

/// Reduce a catalog search hit to a product
pub fn extract_product(product: &Value) -> Product {
    let allergens_hierarchy = product
        .get("allergens_hierarchy")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Product {
        name: as_text(product, "product_name").unwrap_or_default(),
        allergens_hierarchy: Some(allergens_hierarchy),
        nutrients: extract_nutrients(product),
        serving_size: as_text(product, "serving_size"),
        code: as_text(product, "code"),
        brands: as_text(product, "brands"),
        image_url: as_text(product, "image_url"),
        environmental_data: Default::default(),
    }
}

/// Open Food Facts search client
pub struct CatalogClient {
    base_url: String,
    client: Client,
}

impl CatalogClient {
    /// Client for the catalog at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[async_trait]
impl ProductSource for CatalogClient {
    fn name(&self) -> &'static str {
        "openfoodfacts"
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<Product>, SourceError> {
        let url = format!("{}/cgi/search.pl", self.base_url.trim_end_matches('/'));
        let page_size = limit.to_string();

        tracing::debug!("Searching catalog for '{}' at {}", term, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("search_terms", term),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", page_size.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        let products = body
            .get("products")
            .and_then(Value::as_array)
            .ok_or_else(|| SourceError::InvalidResponse("Missing products array".into()))?;

        Ok(products.iter().take(limit).map(extract_product).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductKind;
    use serde_json::json;

    #[test]
    fn test_extract_prefers_per_serving() {
        let hit = json!({
            "nutriments": {
                "energy-kcal_serving": 120,
                "energy-kcal_100g": 400,
                "energy-kcal_unit": "kcal",
                "fat_100g": "3.5",
                "fat_unit": "g",
                "sodium_100g": 0.2
            }
        });
        let nutrients = extract_nutrients(&hit);
        assert_eq!(nutrients.len(), 3);
        assert_eq!(
            nutrients[0],
            NutrientEntry::new("Energy", 120.0, "kcal", NutrientBasis::PerServing)
        );
        assert_eq!(
            nutrients[1],
            NutrientEntry::new("Fat", 3.5, "g", NutrientBasis::Per100g)
        );
        assert_eq!(nutrients[2].name, "Sodium");
        assert_eq!(nutrients[2].unit, "g");
    }

    #[test]
    fn test_extract_product() {
        let hit = json!({
            "product_name": "Nutella",
            "code": "3017620422003",
            "brands": "Ferrero",
            "serving_size": "15 g",
            "allergens_hierarchy": ["en:milk", "en:nuts", "en:soybeans"],
            "nutriments": {"sugars_100g": 56.3}
        });
        let product = extract_product(&hit);
        assert_eq!(product.name, "Nutella");
        assert_eq!(product.kind(), ProductKind::Catalog);
        assert_eq!(product.allergens_hierarchy.as_ref().unwrap().len(), 3);
        assert_eq!(product.serving_size.as_deref(), Some("15 g"));
        assert_eq!(product.nutrients.len(), 1);
    }

    #[test]
    fn test_extract_product_without_allergens_is_still_catalog() {
        let product = extract_product(&json!({"product_name": "Sugar"}));
        assert_eq!(product.kind(), ProductKind::Catalog);
        assert!(product.nutrients.is_empty());
        assert_eq!(product.serving_size, None);
    }
}
