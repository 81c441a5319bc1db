//! Runtime configuration
//!
//! Everything is read from the environment; unset or unparsable values fall
//! back to defaults.

use std::path::PathBuf;

use crate::sources::catalog::DEFAULT_CATALOG_URL;

/// Candidate products fetched per ingredient
pub const DEFAULT_PRODUCT_LIMIT: usize = 6;

/// Recipes scanned per search
pub const DEFAULT_RECIPE_SCAN_LIMIT: i64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub catalog_url: String,
    pub product_limit: usize,
    pub recipe_scan_limit: i64,
}

impl Config {
    /// Configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("RECIPEWISE_DATABASE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let catalog_url = lookup("RECIPEWISE_CATALOG_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());

        let product_limit = lookup("RECIPEWISE_PRODUCT_LIMIT")
            .and_then(|v| v.trim().parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_PRODUCT_LIMIT);

        let recipe_scan_limit = lookup("RECIPEWISE_RECIPE_SCAN_LIMIT")
            .and_then(|v| v.trim().parse().ok())
            .filter(|n: &i64| *n > 0)
            .unwrap_or(DEFAULT_RECIPE_SCAN_LIMIT);

        Self {
            database_path,
            catalog_url,
            product_limit,
            recipe_scan_limit,
        }
    }
}

/// `<project>/data/recipewise.db`, found by walking up out of target/{debug,release}
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(project) = path.parent().and_then(|target| target.parent()) {
            path = project.to_path_buf();
        }
    }

    path.push("data");
    path.push("recipewise.db");
    path
}
