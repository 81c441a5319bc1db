//! Status Tool
//!
//! Runtime status of the service plus the usage guide handed to assistants.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;
use crate::models::{Food, Recipe};

/// How to chain the tools for a recipe check
pub const USAGE_INSTRUCTIONS: &str = r#"
# Recipewise Usage

Recipewise checks a recipe's ingredients for allergens and adds up their nutrition.

## Typical session

1. **Pick a recipe**
   - `search_recipes` with a title fragment and the user's allergens. Recipes whose
     ingredient lines mention any of the allergens are left out.
   - `get_recipe` with the exact title for ingredient lines and bare names.
   - Or `parse_custom_recipe` with the user's own lines ("2 cups flour", "salt").

2. **Find products** for each ingredient name with `fetch_products`.
   - `source: "openfoodfacts"` searches the online catalog. These products carry a
     declared allergen list.
   - `source: "localdb"` searches the local USDA database. Nutrients are per 100 g
     and allergens are guessed from the product name.

3. **Let the user choose one product per ingredient.** Optionally attach an amount:
   `"quantity": 2, "unit": "cup"`. Both are needed; one without the other is ignored.

4. **Analyse the selection** (ingredient name → chosen product, as returned by
   `fetch_products`, plus quantity/unit):
   - `check_allergens` with the user's allergens
   - `calculate_nutrition` for totals of Energy, Fat, Saturated Fat, Carbohydrates,
     Sugars, Fiber, Proteins, Salt and Sodium
   - `calculate_environmental_impact` for summed impact figures, when products have them

## Units

Weight: g, kg, mg, oz, lb. Volume: ml, l, dl, cl, tsp, tbsp, cup, pint, quart,
gallon, fl oz (volume is counted as grams at the density of water).
Count units (piece, slice, clove, pinch, ...) can't be weighed; products given an
amount in them are left out of the totals.

A product with no usable serving size is counted as 100 g. A product whose serving
size can't be read (e.g. "a pinch") is left out.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct RecipewiseStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub local_food_count: Option<i64>,
    pub recipe_count: Option<i64>,

    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Start tracking uptime from now
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            database_path,
        }
    }

    /// Current server status
    pub fn get_status(&self, database: &Database) -> RecipewiseStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let local_food_count = database.with_conn(Food::count).ok();
        let recipe_count = database.with_conn(Recipe::count).ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        RecipewiseStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            local_food_count,
            recipe_count,
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_status_counts() {
        let database = Database::in_memory().unwrap();
        database.with_conn(run_migrations).unwrap();

        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/recipewise.db"));
        let status = tracker.get_status(&database);

        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.local_food_count, Some(0));
        assert_eq!(status.recipe_count, Some(0));
        assert_eq!(status.process_id, std::process::id());
    }
}
