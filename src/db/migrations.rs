//! Versioned schema migrations
//!
//! Each entry in [`MIGRATIONS`] runs once, in order, and is recorded in
//! `schema_migrations`.

use rusqlite::Connection;

use super::connection::DbResult;

/// (version, SQL) pairs, ascending
const MIGRATIONS: &[(i32, &str)] = &[(1, V1_FOODS_AND_RECIPES)];

const SCHEMA_VERSION: i32 = 1;

const V1_FOODS_AND_RECIPES: &str = r#"
        -- Local nutrient database (USDA FoundationFoods)
        CREATE TABLE foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL
        );

        CREATE INDEX idx_foods_description ON foods(description);

        -- Per-100g nutrient amounts for each food
        CREATE TABLE nutrients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            food_id INTEGER NOT NULL REFERENCES foods(id) ON DELETE CASCADE,
            nutrient_name TEXT NOT NULL,
            amount REAL NOT NULL DEFAULT 0,
            unit TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX idx_nutrients_food ON nutrients(food_id);

        -- Searchable recipe dataset; list columns hold JSON arrays
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            ingredients TEXT NOT NULL DEFAULT '[]',
            directions TEXT NOT NULL DEFAULT '[]',
            ner TEXT NOT NULL DEFAULT '[]',
            link TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_title ON recipes(title);
"#;

/// Apply every migration newer than the recorded schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )?;

    let current = get_schema_version(conn)?;

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.execute("INSERT INTO schema_migrations (version) VALUES (?1)", [version])?;
        tx.commit()?;
        tracing::info!("Applied schema migration v{}", version);
    }

    Ok(())
}

/// Highest applied migration version, 0 if none
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// True for a fresh database as well as an outdated one
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let tracked: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
        [],
        |row| row.get(0),
    )?;
    if !tracked {
        return Ok(true);
    }
    Ok(get_schema_version(conn)? < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }
}
