//! Parsed ingredient lines and the custom-recipe projection built from them.

use serde::{Deserialize, Serialize};

use crate::nutrition::units::is_known_unit;

/// One ingredient line split into quantity, unit and name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    pub ingredient_text: String,
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

impl ParsedIngredient {
    /// The parsed unit, only if the unit table recognizes it
    pub fn validated_unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|u| is_known_unit(u))
    }

    /// Numeric quantity, if one was parsed
    pub fn quantity_value(&self) -> Option<f64> {
        self.quantity.as_deref().and_then(|q| q.parse().ok())
    }

    /// "quantity unit name" with missing parts left out
    pub fn display_line(&self) -> String {
        [self.quantity.as_deref(), self.unit.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Display projection of a user-entered recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRecipe {
    pub title: String,
    pub directions: String,
    /// Comma-joined ingredient names
    #[serde(rename = "NER")]
    pub ner: String,
    /// Comma-joined "quantity unit name" lines
    pub ingredients: String,
}
