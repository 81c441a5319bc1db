//! Unit conversion functions
//!
//! Converts a (quantity, unit) pair into grams. Volume units go through
//! milliliters and the magnitude is then read as grams; there is no density
//! lookup, so this is an approximation for anything that isn't water-like.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::units::{categorize_unit, grams_per_unit, ml_per_unit, UnitCategory};

/// Reasons a quantity could not be converted to grams
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Unit '{0}' is not recognized")]
    UnknownUnit(String),

    #[error("Cannot convert {category} unit '{unit}' to grams")]
    UnitMismatch { unit: String, category: UnitCategory },

    #[error("Invalid quantity '{0}'")]
    InvalidQuantity(String),
}

/// A quantity as it arrives from callers: a number, numeric text, or a
/// list whose first element is the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
    List(Vec<Quantity>),
}

impl Quantity {
    /// Resolve to a finite, non-negative number
    pub fn value(&self) -> Result<f64, ConversionError> {
        let value = match self {
            Quantity::Number(n) => *n,
            Quantity::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ConversionError::InvalidQuantity(s.clone()))?,
            Quantity::List(items) => {
                return items
                    .first()
                    .ok_or_else(|| ConversionError::InvalidQuantity("[]".to_string()))?
                    .value();
            }
        };

        if !value.is_finite() || value < 0.0 {
            return Err(ConversionError::InvalidQuantity(value.to_string()));
        }
        Ok(value)
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Number(value)
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Quantity::Text(value.to_string())
    }
}

/// Convert a numeric quantity in the given unit to grams
pub fn convert_to_grams(quantity: f64, unit: &str) -> Result<f64, ConversionError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(ConversionError::InvalidQuantity(quantity.to_string()));
    }

    if let Some(factor) = grams_per_unit(unit) {
        return Ok(quantity * factor);
    }

    // Volume is read as grams once expressed in milliliters
    if let Some(factor) = ml_per_unit(unit) {
        return Ok(quantity * factor);
    }

    match categorize_unit(unit) {
        Some(category) => Err(ConversionError::UnitMismatch {
            unit: unit.to_string(),
            category,
        }),
        None => Err(ConversionError::UnknownUnit(unit.to_string())),
    }
}

/// Convert a caller-supplied quantity (number, text or list) to grams
pub fn convert_quantity_to_grams(quantity: &Quantity, unit: &str) -> Result<f64, ConversionError> {
    convert_to_grams(quantity.value()?, unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::units::{G_PER_OZ, ML_PER_CUP, ML_PER_TBSP};

    #[test]
    fn test_mass_units_are_linear() {
        for (unit, factor) in [("g", 1.0), ("kg", 1000.0), ("mg", 0.001)] {
            for x in [0.0, 1.0, 2.5, 40.0] {
                let grams = convert_to_grams(x, unit).unwrap();
                assert!((grams - x * factor).abs() < 1e-9, "{} {}", x, unit);
            }
        }
        assert_eq!(convert_to_grams(1.0, "kg"), Ok(1000.0));
    }

    #[test]
    fn test_ounces() {
        let grams = convert_to_grams(2.0, "oz").unwrap();
        assert!((grams - 2.0 * G_PER_OZ).abs() < 1e-9);
    }

    #[test]
    fn test_volume_passes_through_as_grams() {
        assert_eq!(convert_to_grams(250.0, "ml"), Ok(250.0));
        let grams = convert_to_grams(1.0, "cup").unwrap();
        assert!((grams - ML_PER_CUP).abs() < 1e-9);
        let grams = convert_to_grams(2.0, "tbsp").unwrap();
        assert!((grams - 2.0 * ML_PER_TBSP).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_unit() {
        assert_eq!(
            convert_to_grams(3.0, "bogus_unit"),
            Err(ConversionError::UnknownUnit("bogus_unit".to_string()))
        );
        assert!(matches!(
            convert_to_grams(3.0, "G"),
            Err(ConversionError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_count_unit_is_mismatch() {
        assert_eq!(
            convert_to_grams(2.0, "pieces"),
            Err(ConversionError::UnitMismatch {
                unit: "pieces".to_string(),
                category: UnitCategory::Count,
            })
        );
    }

    #[test]
    fn test_invalid_quantity() {
        assert!(matches!(
            convert_quantity_to_grams(&Quantity::from("two"), "g"),
            Err(ConversionError::InvalidQuantity(_))
        ));
        assert!(matches!(
            convert_to_grams(-1.0, "g"),
            Err(ConversionError::InvalidQuantity(_))
        ));
        assert!(matches!(
            convert_quantity_to_grams(&Quantity::List(vec![]), "g"),
            Err(ConversionError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_quantity_list_uses_first_element() {
        let q = Quantity::List(vec![Quantity::Number(2.0), Quantity::Number(9.0)]);
        assert_eq!(convert_quantity_to_grams(&q, "kg"), Ok(2000.0));
    }

    #[test]
    fn test_quantity_deserializes_untagged() {
        let q: Quantity = serde_json::from_str("\"1.5\"").unwrap();
        assert_eq!(q.value(), Ok(1.5));
        let q: Quantity = serde_json::from_str("[3]").unwrap();
        assert_eq!(q.value(), Ok(3.0));
        let q: Quantity = serde_json::from_str("12").unwrap();
        assert_eq!(q.value(), Ok(12.0));
    }
}
