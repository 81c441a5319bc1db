//! Import recipes from a JSON array into the recipe dataset
//!
//! Each element needs a `title`; `ingredients`, `directions`, `NER` and
//! `link` are optional.
//!
//! Usage: import_recipes <recipes.json>

use std::fs::File;
use std::io::BufReader;

use recipewise::config::Config;
use recipewise::db::{migrations, Database};
use recipewise::models::{Recipe, RecipeCreate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(input) = std::env::args().nth(1) else {
        eprintln!("Usage: import_recipes <recipes.json>");
        std::process::exit(2);
    };

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let recipes: Vec<RecipeCreate> = serde_json::from_reader(BufReader::new(File::open(&input)?))?;
    println!("Read {} recipes from {}", recipes.len(), input);

    let database = Database::new(&config.database_path)?;
    database.with_conn(migrations::run_migrations)?;

    let imported = database.with_transaction(|tx| {
        let mut imported = 0;
        for recipe in recipes.iter().filter(|r| !r.title.trim().is_empty()) {
            Recipe::create(tx, recipe)?;
            imported += 1;
        }
        Ok(imported)
    })?;

    let total = database.with_conn(Recipe::count)?;
    println!(
        "Imported {} recipes ({} skipped without a title), {} in dataset",
        imported,
        recipes.len() - imported,
        total
    );

    Ok(())
}
