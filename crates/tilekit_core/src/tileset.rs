//! Tileset model: atlas or image-collection tilesets with per-tile metadata

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::collision::{CollisionObject, Hitbox};
use crate::value::{Properties, PropertyValue};
use crate::wang::WangSet;

/// An image referenced by a tileset or a single tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetImage {
    /// Path as written in the document (relative to the `.tsx` file)
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl TilesetImage {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }
}

/// Grid orientation used by the editor when displaying tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridOrientation {
    #[default]
    Orthogonal,
    Isometric,
}

/// Per-tile metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    pub id: u32,
    /// Tiled `type` (<= 1.8) or `class` (>= 1.9) attribute, e.g. "Bush"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Relative weight when the editor picks among equivalent tiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f32>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    /// Own image (image-collection tilesets only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TilesetImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collision: Vec<CollisionObject>,
}

impl TileDef {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            class: None,
            probability: None,
            properties: Properties::new(),
            image: None,
            collision: Vec::new(),
        }
    }

    /// Set a custom property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Set the tile image
    pub fn with_image(mut self, image: TilesetImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Add a collision object
    pub fn with_collision(mut self, object: CollisionObject) -> Self {
        self.collision.push(object);
        self
    }

    /// Get a custom property
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Probability weight, 1.0 when not declared
    pub fn weight(&self) -> f32 {
        self.probability.unwrap_or(1.0)
    }

    /// Classification name: the explicit class attribute, else a string `type` property
    pub fn class_name(&self) -> Option<&str> {
        self.class
            .as_deref()
            .or_else(|| self.property("type").and_then(|v| v.as_str()))
    }

    /// First rectangle in the collision group
    pub fn first_rectangle(&self) -> Option<Hitbox> {
        self.collision.iter().find_map(|obj| obj.as_rectangle())
    }

    /// Check if any metadata is set beyond the id
    pub fn is_empty(&self) -> bool {
        self.class.is_none()
            && self.probability.is_none()
            && self.properties.is_empty()
            && self.image.is_none()
            && self.collision.is_empty()
    }
}

/// Tileset loaded from a `.tsx` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Declared tile count (`tilecount` attribute)
    pub tile_count: u32,
    /// Atlas columns; 0 for image-collection tilesets
    pub columns: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub margin: u32,
    /// Atlas image (absent for image collections)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TilesetImage>,
    #[serde(default)]
    pub grid: GridOrientation,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    /// Tiles with explicit metadata, keyed by id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tiles: BTreeMap<u32, TileDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wang_sets: Vec<WangSet>,
}

impl Tileset {
    /// Create an atlas tileset over a single image strip
    pub fn new(
        name: impl Into<String>,
        tile_width: u32,
        tile_height: u32,
        tile_count: u32,
        columns: u32,
    ) -> Self {
        Self {
            name: name.into(),
            tile_width,
            tile_height,
            tile_count,
            columns,
            spacing: 0,
            margin: 0,
            image: None,
            grid: GridOrientation::default(),
            properties: Properties::new(),
            tiles: BTreeMap::new(),
            wang_sets: Vec::new(),
        }
    }

    /// Image-collection tilesets give every tile its own image
    pub fn is_image_collection(&self) -> bool {
        self.columns == 0
    }

    /// Atlas rows (0 for image collections)
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            0
        } else {
            self.tile_count.div_ceil(self.columns)
        }
    }

    /// Check if a tile id can exist in this tileset.
    ///
    /// Atlas ids are bounded by `tile_count`; image collections keep ids stable
    /// across edits, so any listed tile is valid there.
    pub fn contains_id(&self, tile_id: u32) -> bool {
        if self.is_image_collection() {
            self.tiles.contains_key(&tile_id)
        } else {
            tile_id < self.tile_count
        }
    }

    pub fn tile(&self, tile_id: u32) -> Option<&TileDef> {
        self.tiles.get(&tile_id)
    }

    /// Insert or replace tile metadata
    pub fn insert_tile(&mut self, tile: TileDef) -> Option<TileDef> {
        self.tiles.insert(tile.id, tile)
    }

    /// Tiles with metadata, ordered by id
    pub fn tile_defs(&self) -> impl Iterator<Item = &TileDef> {
        self.tiles.values()
    }

    /// Get a wang set by name
    pub fn wang_set(&self, name: &str) -> Option<&WangSet> {
        self.wang_sets.iter().find(|ws| ws.name == name)
    }

    /// Pixel size of a tile: own image for image collections, grid size otherwise
    pub fn tile_size(&self, tile_id: u32) -> Option<(u32, u32)> {
        if self.is_image_collection() {
            self.tile(tile_id)
                .and_then(|t| t.image.as_ref())
                .map(|img| (img.width, img.height))
        } else if tile_id < self.tile_count {
            Some((self.tile_width, self.tile_height))
        } else {
            None
        }
    }

    /// Tile-local pixel bounds used for collision containment
    pub fn tile_bounds(&self, tile_id: u32) -> Option<Hitbox> {
        self.tile_size(tile_id)
            .map(|(w, h)| Hitbox::new(0.0, 0.0, w as f32, h as f32))
    }

    /// Convert tile id to (column, row) within the atlas
    pub fn tile_grid_position(&self, tile_id: u32) -> Option<(u32, u32)> {
        if self.is_image_collection() || tile_id >= self.tile_count {
            return None;
        }
        Some((tile_id % self.columns, tile_id / self.columns))
    }

    /// Pixel rectangle of a tile inside the atlas image, `None` when the
    /// offset does not fit in a `u32`
    pub fn atlas_rect(&self, tile_id: u32) -> Option<Hitbox> {
        let (col, row) = self.tile_grid_position(tile_id)?;
        let offset = |index: u32, size: u32| {
            size.checked_add(self.spacing)?
                .checked_mul(index)?
                .checked_add(self.margin)
        };
        let x = offset(col, self.tile_width)?;
        let y = offset(row, self.tile_height)?;
        Some(Hitbox::new(
            x as f32,
            y as f32,
            self.tile_width as f32,
            self.tile_height as f32,
        ))
    }
}
