//! Tileset validation logic

use serde::Serialize;
use thiserror::Error;
use tilekit_core::{Hitbox, PropertyValue, Tileset};

use crate::{PropType, PropertyDef, PropertySchema, SchemaError};

/// A problem found in a tileset
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("tile {tile_id} is outside the tileset's {tile_count} tiles")]
    TileOutOfRange { tile_id: u32, tile_count: u32 },
    #[error("wang set '{wangset}' references tile {tile_id}, which does not exist")]
    UnknownWangTile { wangset: String, tile_id: u32 },
    #[error("wang set '{wangset}' tile {tile_id} uses color {value} at position {position}, the set has {max} colors")]
    WangColorOutOfRange {
        wangset: String,
        tile_id: u32,
        position: usize,
        value: u8,
        max: u8,
    },
    #[error("tile {tile_id} collision object {object_id} {bounds:?} is not inside the tile bounds {tile_bounds:?}")]
    CollisionOutOfBounds {
        tile_id: u32,
        object_id: u32,
        bounds: Hitbox,
        tile_bounds: Hitbox,
    },
    #[error("tile {tile_id} has probability {probability}, expected a finite value >= 0")]
    InvalidProbability { tile_id: u32, probability: f32 },
    #[error("wang set '{wangset}' color {color} has probability {probability}, expected a finite value >= 0")]
    InvalidColorProbability {
        wangset: String,
        color: u8,
        probability: f32,
    },
    #[error("tile {tile_id} ({class}) is missing required property '{property}'")]
    MissingProperty {
        tile_id: u32,
        class: String,
        property: String,
    },
    #[error("tile {tile_id} ({class}) property '{property}' {reason}")]
    InvalidProperty {
        tile_id: u32,
        class: String,
        property: String,
        reason: String,
    },
}

/// Check the structural invariants of a tileset
pub fn validate_tileset(tileset: &Tileset) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for tile in tileset.tile_defs() {
        if !tileset.is_image_collection() && tile.id >= tileset.tile_count {
            issues.push(ValidationIssue::TileOutOfRange {
                tile_id: tile.id,
                tile_count: tileset.tile_count,
            });
        }

        if let Some(probability) = tile.probability.filter(|&p| !valid_probability(p)) {
            issues.push(ValidationIssue::InvalidProbability {
                tile_id: tile.id,
                probability,
            });
        }

        if let Some(tile_bounds) = tileset.tile_bounds(tile.id) {
            for object in &tile.collision {
                let bounds = object.bounds();
                if !tile_bounds.contains(&bounds) {
                    issues.push(ValidationIssue::CollisionOutOfBounds {
                        tile_id: tile.id,
                        object_id: object.id,
                        bounds,
                        tile_bounds,
                    });
                }
            }
        }
    }

    for wang_set in &tileset.wang_sets {
        let max = wang_set.color_count();
        for (index, color) in wang_set.colors.iter().enumerate() {
            if !valid_probability(color.probability) {
                issues.push(ValidationIssue::InvalidColorProbability {
                    wangset: wang_set.name.clone(),
                    color: index as u8 + 1,
                    probability: color.probability,
                });
            }
        }
        for (&tile_id, wang_id) in &wang_set.wang_tiles {
            if !tileset.contains_id(tile_id) {
                issues.push(ValidationIssue::UnknownWangTile {
                    wangset: wang_set.name.clone(),
                    tile_id,
                });
            }
            for (position, &value) in wang_id.0.iter().enumerate() {
                if value > max {
                    issues.push(ValidationIssue::WangColorOutOfRange {
                        wangset: wang_set.name.clone(),
                        tile_id,
                        position,
                        value,
                        max,
                    });
                }
            }
        }
    }

    issues
}

fn valid_probability(p: f32) -> bool {
    p.is_finite() && p >= 0.0
}

/// Check tile properties against the schema of their class.
///
/// Tiles without a class, or with a class the schema does not list, are skipped.
pub fn validate_properties(tileset: &Tileset, schema: &PropertySchema) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for tile in tileset.tile_defs() {
        let Some(class) = tile.class_name() else {
            continue;
        };
        let Some(class_schema) = schema.get_class(class) else {
            continue;
        };

        for def in &class_schema.properties {
            match tile.property(&def.name) {
                None if def.required => issues.push(ValidationIssue::MissingProperty {
                    tile_id: tile.id,
                    class: class.to_string(),
                    property: def.name.clone(),
                }),
                None => {}
                Some(value) => {
                    if let Err(reason) = validate_property_value(def, value) {
                        issues.push(ValidationIssue::InvalidProperty {
                            tile_id: tile.id,
                            class: class.to_string(),
                            property: def.name.clone(),
                            reason,
                        });
                    }
                }
            }
        }
    }

    issues
}

/// Run every check and fail with the collected issues
pub fn check_tileset(tileset: &Tileset, schema: &PropertySchema) -> Result<(), SchemaError> {
    let mut issues = validate_tileset(tileset);
    issues.extend(validate_properties(tileset, schema));
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Validation(issues))
    }
}

/// Validate that the schema is internally consistent
pub fn validate_schema(schema: &PropertySchema) -> Result<(), SchemaError> {
    for (class, class_schema) in &schema.classes {
        for (i, def) in class_schema.properties.iter().enumerate() {
            if def.prop_type == PropType::Enum && def.values.is_empty() {
                return Err(SchemaError::InvalidSchema(format!(
                    "class '{}' enum property '{}' lists no values",
                    class, def.name
                )));
            }
            if let (Some(min), Some(max)) = (def.min, def.max) {
                if min > max {
                    return Err(SchemaError::InvalidSchema(format!(
                        "class '{}' property '{}' has min {} above max {}",
                        class, def.name, min, max
                    )));
                }
            }
            if class_schema.properties[..i].iter().any(|p| p.name == def.name) {
                return Err(SchemaError::InvalidSchema(format!(
                    "class '{}' lists property '{}' twice",
                    class, def.name
                )));
            }
        }
    }

    Ok(())
}

/// Validate a single property value against its definition
fn validate_property_value(def: &PropertyDef, value: &PropertyValue) -> Result<(), String> {
    let expected = match def.prop_type {
        PropType::String => "string",
        PropType::Int => "int",
        PropType::Float => "float",
        PropType::Bool => "bool",
        PropType::Color => "color",
        PropType::File => "file",
        PropType::Object => "object",
        PropType::Class => "class",
        PropType::Enum => "string",
    };

    // Integers are acceptable wherever a float is expected
    let number = match (def.prop_type, value) {
        (PropType::Float, PropertyValue::Int(_)) | (PropType::Float, PropertyValue::Float(_)) => {
            value.as_float()
        }
        (PropType::Int, PropertyValue::Int(_)) => value.as_float(),
        _ if value.type_name() == expected => None,
        _ => {
            return Err(format!(
                "must be {} but is {} '{}'",
                expected,
                value.type_name(),
                value
            ))
        }
    };

    if let Some(n) = number {
        if let Some(min) = def.min.filter(|min| n < *min) {
            return Err(format!("must be >= {} but is {}", min, n));
        }
        if let Some(max) = def.max.filter(|max| n > *max) {
            return Err(format!("must be <= {} but is {}", max, n));
        }
    }

    if def.prop_type == PropType::Enum {
        let s = value.as_str().unwrap_or_default();
        if !def.values.iter().any(|v| v == s) {
            return Err(format!("must be one of {:?} but is '{}'", def.values, s));
        }
    }

    Ok(())
}
