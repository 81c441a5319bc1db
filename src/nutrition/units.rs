//! Recognized units
//!
//! Mass, volume and energy spellings with their factor to a base unit, plus
//! the count words that can't be weighed. Lookups are case-sensitive: "g" is
//! a gram, "G" is not registered.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Weight,
    Volume,
    /// Pieces, slices, pinches and the like
    Count,
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitCategory::Weight => "weight",
            UnitCategory::Volume => "volume",
            UnitCategory::Count => "count",
        };
        f.write_str(s)
    }
}

// US customary volumes, in milliliters
pub const ML_PER_TSP: f64 = 4.92892;
pub const ML_PER_TBSP: f64 = 14.7868;
pub const ML_PER_FL_OZ: f64 = 29.5735;
pub const ML_PER_CUP: f64 = 236.588;
pub const ML_PER_PINT: f64 = 473.176;
pub const ML_PER_QUART: f64 = 946.353;
pub const ML_PER_GALLON: f64 = 3785.41;

// Avoirdupois weights, in grams
pub const G_PER_OZ: f64 = 28.3495;
pub const G_PER_LB: f64 = 453.592;

pub const KJ_PER_KCAL: f64 = 4.184;

/// Spellings and their factor to the base unit (grams)
const MASS_UNITS: &[(&[&str], f64)] = &[
    (&["g", "gram", "grams", "gramme", "grammes"], 1.0),
    (&["mg", "milligram", "milligrams"], 1e-3),
    (&["µg", "ug", "mcg", "microgram", "micrograms"], 1e-6),
    (&["kg", "kilogram", "kilograms"], 1e3),
    (&["oz", "ounce", "ounces"], G_PER_OZ),
    (&["lb", "lbs", "pound", "pounds"], G_PER_LB),
];

/// Spellings and their factor to the base unit (milliliters)
const VOLUME_UNITS: &[(&[&str], f64)] = &[
    (&["ml", "mL", "milliliter", "milliliters", "millilitre", "millilitres"], 1.0),
    (&["cl", "cL", "centiliter", "centiliters", "centilitre", "centilitres"], 10.0),
    (&["dl", "dL", "deciliter", "deciliters", "decilitre", "decilitres"], 100.0),
    (&["l", "L", "liter", "liters", "litre", "litres"], 1000.0),
    (&["tsp", "teaspoon", "teaspoons"], ML_PER_TSP),
    (&["tbsp", "Tbsp", "tablespoon", "tablespoons"], ML_PER_TBSP),
    (&["fl oz", "floz", "fluid ounce", "fluid ounces"], ML_PER_FL_OZ),
    (&["cup", "cups"], ML_PER_CUP),
    (&["pint", "pints"], ML_PER_PINT),
    (&["quart", "quarts"], ML_PER_QUART),
    (&["gallon", "gallons"], ML_PER_GALLON),
];

/// Spellings and their factor to the base unit (kilocalories)
const ENERGY_UNITS: &[(&[&str], f64)] = &[
    (&["kcal", "Cal", "kilocalorie", "kilocalories"], 1.0),
    (&["kJ", "kj", "kilojoule", "kilojoules"], 1.0 / KJ_PER_KCAL),
];

/// Units that name a number of things rather than an amount
const COUNT_UNITS: &[&str] = &[
    "each", "piece", "pieces", "item", "items", "count", "unit", "units", "slice", "slices",
    "clove", "cloves", "can", "cans", "pinch", "pinches", "dash", "dashes", "serving",
    "servings", "egg", "eggs",
];

fn lookup(table: &[(&[&str], f64)], unit: &str) -> Option<f64> {
    let unit = unit.trim();
    table
        .iter()
        .find(|(spellings, _)| spellings.contains(&unit))
        .map(|(_, factor)| *factor)
}

/// Grams in one of `unit`, for mass units
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    lookup(MASS_UNITS, unit)
}

/// Millilitres in one of `unit`, for volume units
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    lookup(VOLUME_UNITS, unit)
}

/// Kilocalories in one of `unit`, for energy units
pub fn kcal_per_unit(unit: &str) -> Option<f64> {
    lookup(ENERGY_UNITS, unit)
}

/// Category of a registered unit, `None` for anything unknown
pub fn categorize_unit(unit: &str) -> Option<UnitCategory> {
    let unit = unit.trim();
    if grams_per_unit(unit).is_some() {
        Some(UnitCategory::Weight)
    } else if ml_per_unit(unit).is_some() {
        Some(UnitCategory::Volume)
    } else if COUNT_UNITS.contains(&unit) {
        Some(UnitCategory::Count)
    } else {
        None
    }
}

/// Whether a unit string is registered in the unit table
pub fn is_known_unit(unit: &str) -> bool {
    categorize_unit(unit).is_some()
}

/// Convert a nutrient amount between two units of the same dimension.
///
/// Mass units convert through grams and energy units through kilocalories.
/// An empty unit is treated as unspecified and passes through unchanged.
/// Returns `None` when the units cannot be reconciled.
pub fn convert_amount(amount: f64, from: &str, to: &str) -> Option<f64> {
    let (from, to) = (from.trim(), to.trim());
    if from == to || from.is_empty() || to.is_empty() {
        return Some(amount);
    }

    if let (Some(f), Some(t)) = (grams_per_unit(from), grams_per_unit(to)) {
        return Some(amount * f / t);
    }

    if let (Some(f), Some(t)) = (kcal_per_unit(from), kcal_per_unit(to)) {
        return Some(amount * f / t);
    }

    None
}
