//! Serving-size parsing
//!
//! Product serving sizes arrive as loose text ("30g", "1 cup (240ml)",
//! "2 pieces (50g)"). Only a leading number followed by a unit word is
//! understood; anything else yields `None` and the caller decides what to do.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::converter::{convert_to_grams, ConversionError};

static LEADING_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?|\.\d+)\s*([A-Za-z]+)").expect("valid serving pattern")
});

static PAREN_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*(\d+(?:\.\d+)?|\.\d+)\s*([A-Za-z]+)\s*\)").expect("valid annotation pattern")
});

/// A serving size reduced to a number and a unit word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingSize {
    pub quantity: f64,
    pub unit: String,
}

impl ServingSize {
    /// Convert this serving to grams
    pub fn to_grams(&self) -> Result<f64, ConversionError> {
        convert_to_grams(self.quantity, &self.unit)
    }
}

fn capture_amount(caps: regex::Captures<'_>) -> Option<ServingSize> {
    let quantity = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = caps.get(2)?.as_str().to_string();
    Some(ServingSize { quantity, unit })
}

/// Parse the leading (quantity, unit) pair of a serving-size string.
///
/// Examples:
/// - "30g" -> (30.0, "g")
/// - "1 cup (240ml)" -> (1.0, "cup")
/// - "a pinch" -> None
pub fn parse_serving_size(text: &str) -> Option<ServingSize> {
    let parsed = LEADING_AMOUNT.captures(text).and_then(capture_amount);
    if parsed.is_none() {
        tracing::debug!("Could not parse serving size: {:?}", text);
    }
    parsed
}

/// Weight of one serving in grams.
///
/// A parenthetical annotation that converts ("1 cup (240ml)", "2 pieces (50g)")
/// wins over the leading pair, since the leading unit is often a count.
pub fn parse_serving_grams(text: &str) -> Option<f64> {
    let annotated = PAREN_AMOUNT
        .captures(text)
        .and_then(capture_amount)
        .and_then(|s| s.to_grams().ok());

    annotated.or_else(|| parse_serving_size(text).and_then(|s| s.to_grams().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_serving() {
        assert_eq!(
            parse_serving_size("30g"),
            Some(ServingSize { quantity: 30.0, unit: "g".to_string() })
        );
    }

    #[test]
    fn test_serving_with_space_and_annotation() {
        assert_eq!(
            parse_serving_size("1 cup (240ml)"),
            Some(ServingSize { quantity: 1.0, unit: "cup".to_string() })
        );
        assert_eq!(
            parse_serving_size("2.5 oz"),
            Some(ServingSize { quantity: 2.5, unit: "oz".to_string() })
        );
    }

    #[test]
    fn test_unparsable_serving() {
        assert_eq!(parse_serving_size("a pinch"), None);
        assert_eq!(parse_serving_size("to taste"), None);
        assert_eq!(parse_serving_size(""), None);
        assert_eq!(parse_serving_size("30"), None);
    }

    #[test]
    fn test_serving_grams_prefers_annotation() {
        assert_eq!(parse_serving_grams("2 pieces (50g)"), Some(50.0));
        assert_eq!(parse_serving_grams("1 cup (240ml)"), Some(240.0));
        assert_eq!(parse_serving_grams("30g"), Some(30.0));
        assert_eq!(parse_serving_grams("1 slice"), None);
    }
}
