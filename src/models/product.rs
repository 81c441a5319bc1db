//! Product model
//!
//! A candidate ingredient source, either from the Open Food Facts catalog or
//! from the local nutrient database. Products are request-scoped snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::nutrition::Quantity;

/// Whether a nutrient amount is for one serving or for 100 grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NutrientBasis {
    #[default]
    PerServing,
    #[serde(rename = "per_100g")]
    Per100g,
}

/// One nutrient value reported for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientEntry {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub basis: NutrientBasis,
}

impl NutrientEntry {
    /// Nutrient entry with the given basis
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>, basis: NutrientBasis) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
            basis,
        }
    }
}

/// Where a product record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Carries a structured allergen hierarchy
    Catalog,
    /// Free-text name and nutrients only
    LocalDatabase,
}

/// A candidate product for an ingredient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "product_name", alias = "name", default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergens_hierarchy: Option<Vec<String>>,
    #[serde(default)]
    pub nutrients: Vec<NutrientEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Free-form impact figures (e.g. "co2_kg"); non-numeric values are ignored
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environmental_data: BTreeMap<String, serde_json::Value>,
}

impl Product {
    /// Where this product came from
    pub fn kind(&self) -> ProductKind {
        if self.allergens_hierarchy.is_some() {
            ProductKind::Catalog
        } else {
            ProductKind::LocalDatabase
        }
    }
}

/// A product chosen for an ingredient, with an optional user quantity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl SelectedProduct {
    /// Selection with no amount, so the serving size is used
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: None,
            unit: None,
        }
    }

    /// Set the amount the user will consume
    pub fn with_amount(mut self, quantity: impl Into<Quantity>, unit: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self.unit = Some(unit.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_allergen_hierarchy() {
        let mut product = Product {
            name: "Whole milk".to_string(),
            ..Default::default()
        };
        assert_eq!(product.kind(), ProductKind::LocalDatabase);

        product.allergens_hierarchy = Some(vec![]);
        assert_eq!(product.kind(), ProductKind::Catalog);
    }

    #[test]
    fn test_selected_product_from_frontend_json() {
        let json = r#"{
            "product_name": "Oat drink",
            "allergens_hierarchy": ["en:gluten"],
            "nutrients": [
                {"name": "Energy", "amount": 46, "unit": "kcal", "basis": "per_100g"},
                {"name": "Fat", "amount": 1.5}
            ],
            "serving_size": "250 ml",
            "quantity": "2",
            "unit": "cup"
        }"#;

        let selected: SelectedProduct = serde_json::from_str(json).unwrap();
        assert_eq!(selected.product.name, "Oat drink");
        assert_eq!(selected.product.kind(), ProductKind::Catalog);
        assert_eq!(selected.product.nutrients[0].basis, NutrientBasis::Per100g);
        assert_eq!(selected.product.nutrients[1].basis, NutrientBasis::PerServing);
        assert_eq!(selected.product.nutrients[1].unit, "");
        assert_eq!(selected.quantity, Some(Quantity::Text("2".to_string())));
        assert_eq!(selected.unit.as_deref(), Some("cup"));
    }

    #[test]
    fn test_null_hierarchy_is_local_product() {
        let json = r#"{"product_name": "Hummus, commercial", "allergens_hierarchy": null}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.kind(), ProductKind::LocalDatabase);
        assert!(product.nutrients.is_empty());
    }
}
