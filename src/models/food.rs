//! Local food model
//!
//! Foods and their nutrients in the local database, populated from a USDA
//! FoundationFoods export. Amounts are per 100 grams.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A nutrient row attached to a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// A food in the local nutrient database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub description: String,
    pub nutrients: Vec<FoodNutrient>,
}

// ============================================================================
// FoundationFoods export format
// ============================================================================

/// Top level of a FoundationFoods JSON download
#[derive(Debug, Deserialize)]
pub struct FoundationFoodsFile {
    #[serde(rename = "FoundationFoods")]
    pub foundation_foods: Vec<FoundationFood>,
}

#[derive(Debug, Deserialize)]
pub struct FoundationFood {
    pub description: String,
    #[serde(rename = "foodNutrients", default)]
    pub food_nutrients: Vec<FoundationFoodNutrient>,
}

#[derive(Debug, Deserialize)]
pub struct FoundationFoodNutrient {
    pub nutrient: FoundationNutrientInfo,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct FoundationNutrientInfo {
    pub name: String,
    #[serde(rename = "unitName", default)]
    pub unit_name: String,
}

impl From<&FoundationFoodNutrient> for FoodNutrient {
    fn from(n: &FoundationFoodNutrient) -> Self {
        Self {
            name: n.nutrient.name.clone(),
            amount: n.amount,
            unit: n.nutrient.unit_name.clone(),
        }
    }
}

impl Food {
    fn nutrient_from_row(row: &Row) -> rusqlite::Result<FoodNutrient> {
        Ok(FoodNutrient {
            name: row.get("nutrient_name")?,
            amount: row.get("amount")?,
            unit: row.get("unit")?,
        })
    }

    /// Insert a food and its nutrients, returning the new food id
    pub fn create(conn: &Connection, description: &str, nutrients: &[FoodNutrient]) -> DbResult<i64> {
        let tx = conn.unchecked_transaction()?;

        tx.execute("INSERT INTO foods (description) VALUES (?1)", [description])?;
        let food_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO nutrients (food_id, nutrient_name, amount, unit) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for n in nutrients {
                stmt.execute(params![food_id, n.name, n.amount, n.unit])?;
            }
        }

        tx.commit()?;
        Ok(food_id)
    }

    /// Load every food from a FoundationFoods export; returns the number inserted
    pub fn import_foundation_foods(conn: &Connection, file: &FoundationFoodsFile) -> DbResult<usize> {
        let mut inserted = 0;
        for food in &file.foundation_foods {
            let nutrients: Vec<FoodNutrient> = food.food_nutrients.iter().map(FoodNutrient::from).collect();
            Self::create(conn, &food.description, &nutrients)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Nutrients for a food, in insertion order
    pub fn nutrients_for(conn: &Connection, food_id: i64) -> DbResult<Vec<FoodNutrient>> {
        let mut stmt = conn.prepare(
            "SELECT nutrient_name, amount, unit FROM nutrients WHERE food_id = ?1 ORDER BY id",
        )?;

        let nutrients = stmt
            .query_map([food_id], Self::nutrient_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(nutrients)
    }

    /// Foods whose description contains the term
    pub fn search(conn: &Connection, term: &str, limit: i64) -> DbResult<Vec<Self>> {
        let pattern = format!("%{}%", term);
        let mut stmt = conn.prepare(
            "SELECT id, description FROM foods WHERE description LIKE ?1 ORDER BY id LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![pattern, limit], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, description)| {
                Ok(Self {
                    id,
                    description,
                    nutrients: Self::nutrients_for(conn, id)?,
                })
            })
            .collect()
    }

    /// Count foods in the database
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))?;
        Ok(count)
    }
}
