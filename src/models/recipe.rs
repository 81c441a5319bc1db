//! Recipe model
//!
//! Recipes from the searchable dataset. Ingredient lines, directions and the
//! extracted ingredient names (NER) are stored as JSON arrays.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A recipe from the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub ingredients: Vec<String>,
    pub directions: Vec<String>,
    /// Bare ingredient names, aligned with `ingredients`
    #[serde(rename = "NER")]
    pub ner: Vec<String>,
    pub link: Option<String>,
}

/// Data for inserting a recipe (the import file format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(rename = "NER", default)]
    pub ner: Vec<String>,
    pub link: Option<String>,
}

fn json_column(row: &Row, column: &str) -> rusqlite::Result<Vec<String>> {
    let text: String = row.get(column)?;
    serde_json::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl Recipe {
    /// Create a Recipe from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            ingredients: json_column(row, "ingredients")?,
            directions: json_column(row, "directions")?,
            ner: json_column(row, "ner")?,
            link: row.get("link")?,
        })
    }

    /// Insert a new recipe
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO recipes (title, ingredients, directions, ner, link) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                data.title,
                serde_json::to_string(&data.ingredients)?,
                serde_json::to_string(&data.directions)?,
                serde_json::to_string(&data.ner)?,
                data.link,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The first `limit` recipes in dataset order
    pub fn list(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes ORDER BY id ASC LIMIT ?1")?;

        let recipes = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Count recipes in the dataset
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// All ingredient lines as one comma-separated string
    pub fn ingredients_text(&self) -> String {
        self.ingredients.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_create_and_list() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let created = Recipe::create(
            &conn,
            &RecipeCreate {
                title: "No-Bake Nut Cookies".to_string(),
                ingredients: vec!["1 c. firmly packed brown sugar".to_string(), "1/2 c. evaporated milk".to_string()],
                directions: vec!["Mix.".to_string()],
                ner: vec!["brown sugar".to_string(), "milk".to_string()],
                link: None,
            },
        )
        .unwrap();

        assert_eq!(created.ner, vec!["brown sugar", "milk"]);
        assert_eq!(Recipe::list(&conn, 300).unwrap(), vec![created.clone()]);
        assert_eq!(Recipe::count(&conn).unwrap(), 1);
        assert_eq!(
            created.ingredients_text(),
            "1 c. firmly packed brown sugar, 1/2 c. evaporated milk"
        );
    }

    #[test]
    fn test_import_format() {
        let json = r#"[{"title": "Jewell Ball'S Chicken", "ingredients": ["1 small jar chipped beef"], "NER": ["beef"]}]"#;
        let parsed: Vec<RecipeCreate> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].ner, vec!["beef"]);
        assert!(parsed[0].directions.is_empty());
    }
}
