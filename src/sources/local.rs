//! Local nutrient database source
//!
//! Foods imported from a USDA FoundationFoods export. Nutrient names and
//! units are mapped onto the ones the calculator tracks; amounts are per 100g.

use async_trait::async_trait;

use super::{ProductSource, SourceError};
use crate::db::Database;
use crate::models::{Food, FoodNutrient, NutrientBasis, NutrientEntry, Product};
use crate::nutrition::TRACKED_NUTRIENTS;

const LOCAL_IMAGE_URL: &str = "https://static.openfoodfacts.org/images/logos/off-logo-horizontal-light.svg";

/// Tracked name for a USDA nutrient, if it is one we total
pub fn canonical_nutrient_name(name: &str, unit: &str) -> Option<&'static str> {
    let canonical = match name.trim() {
        "Energy" | "Energy (Atwater General Factors)" => {
            // kJ rows duplicate the kcal figure
            if unit.eq_ignore_ascii_case("kcal") {
                "Energy"
            } else {
                return None;
            }
        }
        "Protein" => "Proteins",
        "Total lipid (fat)" => "Fat",
        "Fatty acids, total saturated" => "Saturated Fat",
        "Carbohydrate, by difference" => "Carbohydrates",
        "Sugars, total including NLEA" | "Total Sugars" => "Sugars",
        "Fiber, total dietary" => "Fiber",
        "Sodium, Na" => "Sodium",
        _ => return None,
    };
    Some(canonical)
}

/// USDA exports spell units in upper case
fn normalize_unit(unit: &str) -> String {
    match unit.trim() {
        "G" | "g" => "g".to_string(),
        "MG" | "mg" => "mg".to_string(),
        "UG" | "ug" | "µg" => "µg".to_string(),
        "KCAL" | "kcal" => "kcal".to_string(),
        "KJ" | "kJ" | "kj" => "kJ".to_string(),
        other => other.to_lowercase(),
    }
}

/// Every nutrient row of a food, per 100g, plus a tracked-name entry for
/// each tracked nutrient the food reports.
///
/// Original names are kept so allergen keywords can match them. A row whose
/// own name is a tracked name but isn't the one chosen for that nutrient
/// (the kJ "Energy" row, for one) gets its unit appended, so only one entry
/// per tracked name reaches the totals.
pub fn map_nutrients(nutrients: &[FoodNutrient]) -> Vec<NutrientEntry> {
    let mut chosen: Vec<(&'static str, usize)> = Vec::new();
    for (i, n) in nutrients.iter().enumerate() {
        if let Some(name) = canonical_nutrient_name(&n.name, &n.unit) {
            if !chosen.iter().any(|(c, _)| *c == name) {
                chosen.push((name, i));
            }
        }
    }

    let mut mapped: Vec<NutrientEntry> = nutrients
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let unit = normalize_unit(&n.unit);
            let name = n.name.trim();
            let is_choice = chosen.iter().any(|(c, idx)| *c == name && *idx == i);
            let name = if TRACKED_NUTRIENTS.contains(&name) && !is_choice {
                format!("{} ({})", name, unit)
            } else {
                name.to_string()
            };
            NutrientEntry::new(name, n.amount, unit, NutrientBasis::Per100g)
        })
        .collect();

    for (name, i) in chosen {
        let n = &nutrients[i];
        if n.name.trim() != name {
            mapped.push(NutrientEntry::new(name, n.amount, normalize_unit(&n.unit), NutrientBasis::Per100g));
        }
    }
    mapped
}

impl From<Food> for Product {
    fn from(food: Food) -> Self {
        Product {
            nutrients: map_nutrients(&food.nutrients),
            name: food.description,
            allergens_hierarchy: None,
            serving_size: Some("100g".to_string()),
            code: Some(format!("local-{}", food.id)),
            brands: None,
            image_url: Some(LOCAL_IMAGE_URL.to_string()),
            environmental_data: Default::default(),
        }
    }
}

/// Product search over the local food tables
#[derive(Clone)]
pub struct LocalFoodDb {
    database: Database,
}

impl LocalFoodDb {
    /// Source backed by the given database
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ProductSource for LocalFoodDb {
    fn name(&self) -> &'static str {
        "localdb"
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<Product>, SourceError> {
        let term = term.trim();
        let foods = self
            .database
            .with_conn(|conn| Food::search(conn, term, limit as i64))?;

        tracing::debug!("Local database returned {} foods for '{}'", foods.len(), term);

        Ok(foods.into_iter().map(Product::from).collect())
    }
}
