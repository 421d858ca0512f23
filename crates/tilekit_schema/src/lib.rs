//! Validation for tilekit tilesets
//!
//! This crate checks the structural invariants of loaded tilesets (tile id
//! bounds, wang colors, collision containment) and validates custom tile
//! properties against a per-class property schema.
//!
//! # Example
//!
//! ```rust,ignore
//! use tilekit_schema::{check_tileset, load_schema};
//!
//! // Load schema from TOML or JSON
//! let schema = load_schema("schema.toml".as_ref())?;
//!
//! // Validate a tileset against it
//! check_tileset(&tileset, &schema)?;
//! ```

mod types;
mod validate;

pub use types::*;
pub use validate::*;

use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading schemas or validating tilesets
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    #[error("{} validation issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),
}

/// Load a schema file; `.toml` files are read as TOML, anything else as JSON
pub fn load_schema(path: &Path) -> Result<PropertySchema, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Io(e.to_string()))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_schema_toml(&content),
        _ => parse_schema(&content),
    }
}

/// Parse a schema from a JSON string
pub fn parse_schema(json: &str) -> Result<PropertySchema, SchemaError> {
    let schema: PropertySchema =
        serde_json::from_str(json).map_err(|e| SchemaError::Parse(e.to_string()))?;

    validate_schema(&schema)?;

    Ok(schema)
}

/// Parse a schema from a TOML string
pub fn parse_schema_toml(content: &str) -> Result<PropertySchema, SchemaError> {
    let schema: PropertySchema =
        toml::from_str(content).map_err(|e| SchemaError::Parse(e.to_string()))?;

    validate_schema(&schema)?;

    Ok(schema)
}

/// Save a schema to a JSON file
pub fn save_schema(schema: &PropertySchema, path: &Path) -> Result<(), SchemaError> {
    let content =
        serde_json::to_string_pretty(schema).map_err(|e| SchemaError::Parse(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| SchemaError::Io(e.to_string()))?;

    Ok(())
}
