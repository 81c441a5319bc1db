//! Allergen detection
//!
//! Keyword table plus the matcher that checks selected products against a
//! user's allergen list.

pub mod keywords;
pub mod matcher;

pub use keywords::AllergenKeywords;
pub use matcher::{check_allergens, normalize_allergens, AllergenMatcher, AllergenReport};
