//! Wang tile resolution for Tiled wang sets
//!
//! This crate picks tiles from a [`tilekit_core::WangSet`] for a desired
//! terrain layout, derives layouts from neighbouring cells and fills whole
//! terrain grids.
//!
//! # Features
//! - Exact, closest and probability-weighted resolution
//! - Masked resolution for partially constrained cells
//! - Corner, Edge, and Mixed set types
//! - Coverage reports listing layouts without a tile
//!
//! # Example
//!
//! ```rust,ignore
//! use tilekit_autotile::WangResolver;
//! use tilekit_core::WangId;
//!
//! let resolver = WangResolver::from_tileset(&tileset, None).unwrap();
//! let tile = resolver.resolve(&WangId::filled(1))?.tile_id;
//!
//! // 3x3 block of grass
//! let filled = resolver.autotile_region(&[true; 9], 3, 3, 1)?;
//! assert!(filled.is_exact());
//! ```

pub mod error;
pub mod fill;
pub mod neighbors;
pub mod resolve;

pub use error::WangError;
pub use fill::{AutotileResult, CoverageReport};
pub use neighbors::{neighbor_layouts, project, reduce_corners, wang_id_from_neighbors};
pub use resolve::{WangMask, WangMatch, WangResolver, FULL_MASK};

// Re-export tilekit_core
pub use tilekit_core;
