//! Collections of loaded tilesets and the object hitbox table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::collision::Hitbox;
use crate::object::ObjectKind;
use crate::tileset::Tileset;

/// Hitbox and classification of one object tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectHitbox {
    pub tile_id: u32,
    pub hitbox: Hitbox,
    /// True when the tile had no collision objects and the image bounds were used
    pub from_image: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObjectKind>,
}

/// Map every tile that has an image to its hitbox.
///
/// Uses the bounding box of the first collision object, whatever its shape;
/// tiles without any collision objects fall back to the full image. All values
/// are multiplied by `scale`.
pub fn object_hitboxes(tileset: &Tileset, scale: f32) -> BTreeMap<u32, ObjectHitbox> {
    let mut result = BTreeMap::new();

    for tile in tileset.tile_defs() {
        let Some(image) = &tile.image else {
            continue;
        };

        let (hitbox, from_image) = match tile.collision.first() {
            Some(obj) => (obj.bounds(), false),
            None => (
                Hitbox::new(0.0, 0.0, image.width as f32, image.height as f32),
                true,
            ),
        };

        result.insert(
            tile.id,
            ObjectHitbox {
                tile_id: tile.id,
                hitbox: hitbox.scaled(scale),
                from_image,
                kind: ObjectKind::from_tile(tile),
            },
        );
    }

    result
}

/// Several tilesets loaded together, addressed by a generated id
#[derive(Debug, Clone, Default)]
pub struct TilesetCatalog {
    entries: Vec<(Uuid, Tileset)>,
}

impl TilesetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tileset and return its id
    pub fn insert(&mut self, tileset: Tileset) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.push((id, tileset));
        id
    }

    /// Get tileset by ID
    pub fn get(&self, id: Uuid) -> Option<&Tileset> {
        self.entries.iter().find(|(i, _)| *i == id).map(|(_, ts)| ts)
    }

    /// Get tileset by name (first match)
    pub fn get_by_name(&self, name: &str) -> Option<&Tileset> {
        self.entries
            .iter()
            .find(|(_, ts)| ts.name == name)
            .map(|(_, ts)| ts)
    }

    /// Remove tileset by ID
    pub fn remove(&mut self, id: Uuid) -> Option<Tileset> {
        let pos = self.entries.iter().position(|(i, _)| *i == id)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uuid, &Tileset)> {
        self.entries.iter().map(|(id, ts)| (*id, ts))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hitboxes of all tilesets merged into one table.
    ///
    /// Later tilesets override earlier ones on id collisions, matching how the
    /// game merges its object tilesets.
    pub fn object_hitboxes(&self, scale: f32) -> BTreeMap<u32, ObjectHitbox> {
        let mut merged = BTreeMap::new();
        for (_, tileset) in &self.entries {
            merged.extend(object_hitboxes(tileset, scale));
        }
        merged
    }
}
