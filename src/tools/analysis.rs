//! Analysis tools
//!
//! Allergen, nutrition and environmental summaries over the products a user
//! picked for a recipe's ingredients.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::allergens::AllergenMatcher;
use crate::impact::{calculate_environmental_impact, ImpactTotals};
use crate::models::SelectedProduct;
use crate::nutrition::{NutrientTotals, NutritionCalculator};

/// Ingredient name → the product chosen for it
pub type Selection = BTreeMap<String, SelectedProduct>;

/// Response for check_allergens
#[derive(Debug, Serialize)]
pub struct AllergenCheckResponse {
    pub safe: bool,
    pub allergens_found: BTreeSet<String>,
    pub by_ingredient: BTreeMap<String, BTreeSet<String>>,
}

/// Response for calculate_nutrition
#[derive(Debug, Serialize)]
pub struct NutritionResponse {
    pub ingredient_count: usize,
    pub totals: NutrientTotals,
}

/// Response for calculate_environmental_impact
#[derive(Debug, Serialize)]
pub struct ImpactResponse {
    pub ingredient_count: usize,
    pub totals: ImpactTotals,
}

/// Allergens found across the selected products, with a per-ingredient report
pub fn check_allergens(
    matcher: &AllergenMatcher,
    selection: &Selection,
    allergens: &[String],
) -> Result<AllergenCheckResponse, String> {
    let report = matcher.report(
        selection.iter().map(|(name, selected)| (name, &selected.product)),
        allergens,
    );

    Ok(AllergenCheckResponse {
        safe: report.allergens_found.is_empty(),
        allergens_found: report.allergens_found,
        by_ingredient: report.by_ingredient,
    })
}

/// Nutrient totals, rounded to two decimals
pub fn calculate_nutrition(calculator: &NutritionCalculator, selection: &Selection) -> Result<NutritionResponse, String> {
    if selection.is_empty() {
        return Err("No products selected".to_string());
    }

    Ok(NutritionResponse {
        ingredient_count: selection.len(),
        totals: calculator.calculate(selection).rounded(),
    })
}

/// Summed environmental data of the selected products
pub fn environmental_impact(selection: &Selection) -> Result<ImpactResponse, String> {
    if selection.is_empty() {
        return Err("No products selected".to_string());
    }

    Ok(ImpactResponse {
        ingredient_count: selection.len(),
        totals: calculate_environmental_impact(selection),
    })
}
