//! Load a USDA FoundationFoods JSON export into the local food database
//!
//! Usage: populate_food_db <FoundationFoods.json>

use std::fs::File;
use std::io::BufReader;

use recipewise::config::Config;
use recipewise::db::{migrations, Database};
use recipewise::models::{Food, FoundationFoodsFile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(input) = std::env::args().nth(1) else {
        eprintln!("Usage: populate_food_db <FoundationFoods.json>");
        std::process::exit(2);
    };

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    println!("Reading {}...", input);
    let file: FoundationFoodsFile = serde_json::from_reader(BufReader::new(File::open(&input)?))?;
    println!("Found {} foods", file.foundation_foods.len());

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;

        let before = Food::count(conn)?;
        let inserted = Food::import_foundation_foods(conn, &file)?;
        println!("Inserted {} foods ({} total, {} before)", inserted, before + inserted as i64, before);
        Ok(())
    })?;

    Ok(())
}
