//! Recipewise Library
//!
//! Recipe search, ingredient parsing, allergen matching and nutrition totals
//! for selected food products.

pub mod allergens;
pub mod build_info;
pub mod config;
pub mod db;
pub mod impact;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod recipes;
pub mod sources;
pub mod tools;
