//! Nutrition aggregation
//!
//! Sums tracked nutrients over a set of selected products. Each product is
//! resolved to a consumed weight in grams first; products that can't be
//! resolved are logged and left out so the rest still add up.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::converter::{convert_quantity_to_grams, convert_to_grams};
use super::serving::{parse_serving_grams, parse_serving_size};
use super::units::convert_amount;
use crate::models::{NutrientBasis, SelectedProduct};

/// Nutrients summed by default
pub const TRACKED_NUTRIENTS: [&str; 9] = [
    "Energy",
    "Fat",
    "Saturated Fat",
    "Carbohydrates",
    "Sugars",
    "Fiber",
    "Proteins",
    "Salt",
    "Sodium",
];

/// Serving assumed when a product doesn't state one
pub const DEFAULT_SERVING_SIZE: &str = "100g";

/// Running total for one nutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotal {
    pub amount: f64,
    pub unit: String,
}

/// Nutrient name → total, in name order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutrientTotals(BTreeMap<String, NutrientTotal>);

impl NutrientTotals {
    /// Empty totals
    pub fn new() -> Self {
        Self::default()
    }

    /// Total for one nutrient
    pub fn get(&self, nutrient: &str) -> Option<&NutrientTotal> {
        self.0.get(nutrient)
    }

    /// Number of nutrients with a total
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing was added
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Totals in nutrient name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &NutrientTotal)> {
        self.0.iter()
    }

    /// Add a contribution. The first contribution fixes the unit; later ones
    /// are converted into it. Returns false (and adds nothing) when the unit
    /// can't be reconciled.
    pub fn add(&mut self, nutrient: &str, amount: f64, unit: &str) -> bool {
        match self.0.get_mut(nutrient) {
            Some(total) => match convert_amount(amount, unit, &total.unit) {
                Some(converted) => {
                    total.amount += converted;
                    true
                }
                None => false,
            },
            None => {
                self.0.insert(
                    nutrient.to_string(),
                    NutrientTotal {
                        amount,
                        unit: unit.to_string(),
                    },
                );
                true
            }
        }
    }

    /// Copy with every amount rounded to two decimals, for display
    pub fn rounded(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(name, total)| {
                    let amount = (total.amount * 100.0).round() / 100.0;
                    (
                        name.clone(),
                        NutrientTotal {
                            amount,
                            unit: total.unit.clone(),
                        },
                    )
                })
                .collect(),
        )
    }
}

/// How much of a product is eaten
#[derive(Debug, Clone, Copy, PartialEq)]
struct Consumption {
    grams: f64,
    /// Multiplier for per-serving nutrient amounts
    servings: f64,
}

/// Sums tracked nutrients over selected products
#[derive(Debug, Clone)]
pub struct NutritionCalculator {
    tracked: BTreeSet<String>,
    default_serving: String,
}

impl Default for NutritionCalculator {
    fn default() -> Self {
        Self::new(TRACKED_NUTRIENTS)
    }
}

impl NutritionCalculator {
    /// Calculator summing only the `tracked` nutrient names
    pub fn new<I, S>(tracked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tracked: tracked.into_iter().map(Into::into).collect(),
            default_serving: DEFAULT_SERVING_SIZE.to_string(),
        }
    }

    /// Whether `nutrient` is summed
    pub fn is_tracked(&self, nutrient: &str) -> bool {
        self.tracked.contains(nutrient)
    }

    /// Work out consumed grams and the per-serving multiplier.
    ///
    /// A user quantity only counts when both quantity and unit are given;
    /// otherwise the product's own serving is eaten once.
    fn consumption(&self, ingredient: &str, selected: &SelectedProduct) -> Option<Consumption> {
        let serving_text = selected
            .product
            .serving_size
            .as_deref()
            .unwrap_or(self.default_serving.as_str());

        if let (Some(quantity), Some(unit)) = (&selected.quantity, &selected.unit) {
            let grams = match convert_quantity_to_grams(quantity, unit) {
                Ok(grams) => grams,
                Err(e) => {
                    tracing::warn!("Could not convert quantity for '{}': {}. Skipping.", ingredient, e);
                    return None;
                }
            };

            let servings = match parse_serving_grams(serving_text) {
                Some(serving_grams) if serving_grams > 0.0 => grams / serving_grams,
                _ => 1.0,
            };

            return Some(Consumption { grams, servings });
        }

        let Some(serving) = parse_serving_size(serving_text) else {
            tracing::warn!(
                "Could not determine serving size for '{}' ({:?}). Skipping.",
                ingredient,
                serving_text
            );
            return None;
        };

        match convert_to_grams(serving.quantity, &serving.unit) {
            Ok(grams) => Some(Consumption { grams, servings: 1.0 }),
            Err(e) => {
                tracing::warn!("Could not convert quantity for '{}': {}. Skipping.", ingredient, e);
                None
            }
        }
    }

    /// Sum tracked nutrients over the selected products.
    ///
    /// Ingredients are visited in name order, so the result doesn't depend on
    /// the iteration order of the input map.
    pub fn calculate<'a, I>(&self, selected: I) -> NutrientTotals
    where
        I: IntoIterator<Item = (&'a String, &'a SelectedProduct)>,
    {
        let mut ordered: Vec<(&String, &SelectedProduct)> = selected.into_iter().collect();
        ordered.sort_by(|a, b| a.0.cmp(b.0));

        let mut totals = NutrientTotals::new();

        for (ingredient, product) in ordered {
            let Some(consumption) = self.consumption(ingredient, product) else {
                continue;
            };

            tracing::debug!(
                "Ingredient '{}': {:.2} g, {:.3} servings",
                ingredient,
                consumption.grams,
                consumption.servings
            );

            for entry in &product.product.nutrients {
                if !self.is_tracked(&entry.name) {
                    continue;
                }
                if !entry.amount.is_finite() || entry.amount < 0.0 {
                    tracing::warn!(
                        "Ignoring invalid {} amount {} for '{}'",
                        entry.name,
                        entry.amount,
                        ingredient
                    );
                    continue;
                }

                let contribution = match entry.basis {
                    NutrientBasis::Per100g => entry.amount * consumption.grams / 100.0,
                    NutrientBasis::PerServing => entry.amount * consumption.servings,
                };

                if !totals.add(&entry.name, contribution, &entry.unit) {
                    tracing::warn!(
                        "Unit '{}' for {} in '{}' doesn't match the running total. Skipping.",
                        entry.unit,
                        entry.name,
                        ingredient
                    );
                }
            }
        }

        totals
    }
}

/// Sum the default tracked nutrients over the selected products
pub fn calculate_nutrition<'a, I>(selected: I) -> NutrientTotals
where
    I: IntoIterator<Item = (&'a String, &'a SelectedProduct)>,
{
    NutritionCalculator::default().calculate(selected)
}
