//! Core data structures for tilekit
//!
//! This crate provides the in-memory model of Tiled tilesets:
//! - `Tileset` - Atlas or image-collection tileset with per-tile metadata
//! - `TileDef` - Tile class, probability, custom properties and collision
//! - `PropertyValue` - Typed custom property value
//! - `CollisionObject` / `Hitbox` - Tile collision geometry
//! - `WangSet` / `WangId` - Terrain (autotile) rules
//! - `ObjectKind` - Tree/bush/decor classification of object tiles
//! - `TilesetCatalog` - Several tilesets loaded together

mod catalog;
mod collision;
mod object;
mod tileset;
mod value;
mod wang;

pub use catalog::{object_hitboxes, ObjectHitbox, TilesetCatalog};
pub use collision::{CollisionObject, CollisionShape, Hitbox};
pub use object::{ObjectKind, TreeSize, NO_FRUIT};
pub use tileset::{GridOrientation, TileDef, Tileset, TilesetImage};
pub use value::{Properties, PropertyValue, ValueParseError};
pub use wang::{
    ParseWangIdError, WangColor, WangId, WangPosition, WangSet, WangSetType, WANG_POSITIONS,
};
