//! Tools module
//!
//! MCP tool implementations. Each function validates its input and returns a
//! serializable response or an error message.

pub mod analysis;
pub mod products;
pub mod recipes;
pub mod status;
