//! Allergen matching
//!
//! Catalog products declare allergens as hierarchy tags ("en:milk"). Local
//! database products only have a description and nutrient names, which are
//! searched for the keywords of each allergen the user cares about.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::keywords::AllergenKeywords;
use crate::models::Product;

/// Which allergens were found, overall and per ingredient
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllergenReport {
    pub allergens_found: BTreeSet<String>,
    /// Ingredient name → allergens it contributed (only non-empty entries)
    pub by_ingredient: BTreeMap<String, BTreeSet<String>>,
}

/// Lower-case, trim and drop blank allergen names
pub fn normalize_allergens<I, S>(allergens: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    allergens
        .into_iter()
        .map(|a| a.as_ref().trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect()
}

/// "en:milk" -> "milk"
fn tag_leaf(tag: &str) -> String {
    tag.rsplit(':').next().unwrap_or(tag).trim().to_lowercase()
}

/// Checks products against a user's allergen selection
#[derive(Debug, Clone, Default)]
pub struct AllergenMatcher {
    keywords: AllergenKeywords,
}

impl AllergenMatcher {
    /// Matcher using the given keyword table
    pub fn new(keywords: AllergenKeywords) -> Self {
        Self { keywords }
    }

    /// Keyword table in use
    pub fn keywords(&self) -> &AllergenKeywords {
        &self.keywords
    }

    /// Allergens detected in one product.
    ///
    /// For catalog products this is every declared allergen; for local
    /// products only the `wanted` allergens are searched for.
    pub fn detect(&self, product: &Product, wanted: &BTreeSet<String>) -> BTreeSet<String> {
        if let Some(hierarchy) = &product.allergens_hierarchy {
            return hierarchy.iter().map(|tag| tag_leaf(tag)).collect();
        }

        let product_name = product.name.to_lowercase();
        let nutrient_names: Vec<String> = product
            .nutrients
            .iter()
            .map(|n| n.name.to_lowercase())
            .collect();

        wanted
            .iter()
            .filter(|allergen| {
                let hit = self.keywords.keywords_for(allergen).into_iter().find(|keyword| {
                    product_name.contains(keyword)
                        || nutrient_names.iter().any(|n| n.contains(keyword))
                });
                if let Some(keyword) = hit {
                    tracing::debug!(
                        "Keyword '{}' for allergen '{}' matched product '{}'",
                        keyword,
                        allergen,
                        product.name
                    );
                }
                hit.is_some()
            })
            .cloned()
            .collect()
    }

    /// Allergens from the selection present in any of the products, with
    /// the ingredients that triggered them.
    pub fn report<'a, I, S>(&self, products: I, selected_allergens: &[S]) -> AllergenReport
    where
        I: IntoIterator<Item = (&'a String, &'a Product)>,
        S: AsRef<str>,
    {
        let wanted = normalize_allergens(selected_allergens);
        let mut report = AllergenReport::default();
        if wanted.is_empty() {
            return report;
        }

        for (ingredient, product) in products {
            let common: BTreeSet<String> = self
                .detect(product, &wanted)
                .intersection(&wanted)
                .cloned()
                .collect();

            if common.is_empty() {
                continue;
            }

            tracing::info!("Ingredient '{}' contains allergens {:?}", ingredient, common);
            report.allergens_found.extend(common.iter().cloned());
            report.by_ingredient.insert(ingredient.clone(), common);
        }

        report
    }

    /// Allergens from the selection present in any of the products
    pub fn check<'a, I, S>(&self, products: I, selected_allergens: &[S]) -> BTreeSet<String>
    where
        I: IntoIterator<Item = (&'a String, &'a Product)>,
        S: AsRef<str>,
    {
        self.report(products, selected_allergens).allergens_found
    }
}

/// Check products with the built-in keyword table
pub fn check_allergens<'a, I, S>(products: I, selected_allergens: &[S]) -> BTreeSet<String>
where
    I: IntoIterator<Item = (&'a String, &'a Product)>,
    S: AsRef<str>,
{
    AllergenMatcher::default().check(products, selected_allergens)
}
