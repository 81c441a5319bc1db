//! Product sources
//!
//! Where candidate products for an ingredient come from: the Open Food Facts
//! catalog over HTTP, or the local nutrient database.

pub mod catalog;
pub mod local;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::DbError;
use crate::models::Product;

pub use catalog::CatalogClient;
pub use local::LocalFoodDb;

/// Errors from fetching products
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Catalog returned error status {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Local database error: {0}")]
    Database(#[from] DbError),

    #[error("Unknown product source '{0}'")]
    UnknownSource(String),
}

/// A searchable supply of candidate products
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Short identifier used in logs and requests
    fn name(&self) -> &'static str;

    /// Up to `limit` products matching an ingredient name
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<Product>, SourceError>;
}

/// Which source a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    OpenFoodFacts,
    LocalDb,
}

impl SourceKind {
    /// Parse a source name as sent by MCP clients
    pub fn parse(s: &str) -> Result<Self, SourceError> {
        match s.trim().to_lowercase().as_str() {
            "openfoodfacts" | "off" | "catalog" => Ok(SourceKind::OpenFoodFacts),
            "localdb" | "local" => Ok(SourceKind::LocalDb),
            other => Err(SourceError::UnknownSource(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_parse() {
        assert_eq!(SourceKind::parse("openfoodfacts").unwrap(), SourceKind::OpenFoodFacts);
        assert_eq!(SourceKind::parse("LocalDB").unwrap(), SourceKind::LocalDb);
        assert!(matches!(
            SourceKind::parse("usda"),
            Err(SourceError::UnknownSource(_))
        ));
    }
}
