//! Nutrition calculation module
//!
//! Unit conversion, serving-size parsing and nutrient aggregation.

pub mod aggregate;
pub mod converter;
pub mod serving;
pub mod units;

pub use aggregate::{
    calculate_nutrition, NutrientTotal, NutrientTotals, NutritionCalculator,
    DEFAULT_SERVING_SIZE, TRACKED_NUTRIENTS,
};
pub use converter::{convert_quantity_to_grams, convert_to_grams, ConversionError, Quantity};
pub use serving::{parse_serving_grams, parse_serving_size, ServingSize};
pub use units::{categorize_unit, convert_amount, grams_per_unit, is_known_unit, ml_per_unit, UnitCategory};
