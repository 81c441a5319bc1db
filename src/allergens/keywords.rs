//! Allergen keyword table
//!
//! Free-text products carry no allergen metadata, so presence is guessed by
//! searching their names for related words. The table is a plain value so
//! callers can extend or replace it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Built-in allergen → keyword list
const DEFAULT_KEYWORDS: &[(&str, &[&str])] = &[
    ("milk", &["milk", "lactose", "casein", "whey", "dairy"]),
    ("egg", &["egg", "albumin", "egg white", "egg yolk"]),
    ("peanut", &["peanut"]),
    (
        "tree nut",
        &[
            "almond",
            "walnut",
            "cashew",
            "hazelnut",
            "pistachio",
            "pecan",
            "macadamia",
            "brazil nut",
            "nut",
        ],
    ),
    (
        "fish",
        &["fish", "cod", "salmon", "tuna", "trout", "anchovy", "bass", "catfish"],
    ),
    (
        "shellfish",
        &["shrimp", "crab", "lobster", "shellfish", "mussel", "oyster", "scallop", "prawn"],
    ),
    ("wheat", &["wheat", "gluten", "farina", "semolina", "spelt", "durum"]),
    ("soy", &["soy", "soya", "soybean", "edamame"]),
    ("sesame", &["sesame", "tahini"]),
    (
        "gluten",
        &["gluten", "wheat", "barley", "rye", "spelt", "triticale", "farina", "semolina"],
    ),
];

/// Mapping from allergen name to the ordered keywords that indicate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllergenKeywords {
    table: BTreeMap<String, Vec<String>>,
}

impl AllergenKeywords {
    /// An empty table; every allergen falls back to its own name
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Add or replace the keywords for an allergen (names are lower-cased)
    pub fn with_allergen<I, S>(mut self, allergen: &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| {
                let keyword: String = k.into();
                keyword.to_lowercase()
            })
            .collect();
        self.table.insert(allergen.trim().to_lowercase(), keywords);
        self
    }

    /// Keywords for an allergen; an unlisted allergen is its own only keyword
    pub fn keywords_for<'a>(&'a self, allergen: &'a str) -> Vec<&'a str> {
        match self.table.get(allergen) {
            Some(keywords) => keywords.iter().map(String::as_str).collect(),
            None => vec![allergen],
        }
    }

    /// Allergen names with a dedicated keyword list
    pub fn allergens(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl Default for AllergenKeywords {
    fn default() -> Self {
        DEFAULT_KEYWORDS
            .iter()
            .fold(Self::empty(), |table, (allergen, keywords)| {
                table.with_allergen(allergen, keywords.iter().copied())
            })
    }
}
