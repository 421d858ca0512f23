//! tilekit - Tiled tileset toolkit
//!
//! Umbrella crate re-exporting the tilekit crates, plus the configuration and
//! command implementations behind the `tilekit` binary.
//!
//! # Crates
//! - [`tilekit_core`] - tileset, tile, property, collision and wang set model
//! - [`tilekit_tsx`] - `.tsx` reader
//! - [`tilekit_autotile`] - wang resolution, region fill and coverage
//! - [`tilekit_schema`] - structural and property validation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tilekit::prelude::*;
//!
//! let tileset = load_tileset("assets/tilesets/Darker_Grass_Tile_Layers.tsx")?;
//! let resolver = WangResolver::from_tileset(&tileset, None).unwrap();
//! let tile = resolver.resolve(&WangId::filled(1))?.tile_id;
//! assert_eq!(tile, 12);
//! ```

pub mod commands;
pub mod config;
mod error;

pub use config::{Config, ConfigError};
pub use error::Error;

// Re-export the member crates
pub use tilekit_autotile;
pub use tilekit_core;
pub use tilekit_schema;
pub use tilekit_tsx;

/// Prelude for convenient imports
pub mod prelude {
    pub use tilekit_autotile::{AutotileResult, CoverageReport, WangError, WangMatch, WangResolver};
    pub use tilekit_core::{
        object_hitboxes, Hitbox, ObjectHitbox, ObjectKind, PropertyValue, TileDef, Tileset,
        TilesetCatalog, WangId, WangSet, WangSetType,
    };
    pub use tilekit_schema::{check_tileset, PropertySchema, SchemaError, ValidationIssue};
    pub use tilekit_tsx::{load_catalog, load_tileset, parse_tileset, TsxError};

    pub use crate::{Config, Error};
}
