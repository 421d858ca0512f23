//! Region autotiling and coverage reports

use serde::Serialize;
use tilekit_core::WangId;
use tracing::debug;

use crate::error::WangError;
use crate::neighbors::{neighbor_layouts, wang_id_from_neighbors};
use crate::resolve::{WangResolver, FULL_MASK};

/// Tiles chosen for a terrain grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutotileResult {
    pub width: u32,
    pub height: u32,
    /// Row-major tile ids, `None` where the grid has no terrain
    pub tiles: Vec<Option<u32>>,
    /// Cells whose neighbour layout had no exact tile, with the layout wanted
    pub unmatched: Vec<(u32, u32, WangId)>,
}

impl AutotileResult {
    pub fn tile_at(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles
            .get((y * self.width + x) as usize)
            .copied()
            .flatten()
    }

    /// True when every terrain cell got an exact tile
    pub fn is_exact(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Neighbour layouts of a wang set with no exact tile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub wangset: String,
    pub color: u8,
    /// Number of distinct layouts the set type can produce
    pub required: usize,
    pub missing: Vec<WangId>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn covered(&self) -> usize {
        self.required - self.missing.len()
    }
}

impl WangResolver<'_> {
    /// Choose a tile for every terrain cell of a row-major grid.
    ///
    /// Cells outside the grid count as non-terrain. Cells without an exact tile
    /// still get the closest one and are listed in `unmatched`.
    pub fn autotile_region(
        &self,
        terrain: &[bool],
        width: u32,
        height: u32,
        color: u8,
    ) -> Result<AutotileResult, WangError> {
        let expected = (width as usize) * (height as usize);
        if terrain.len() != expected {
            return Err(WangError::GridSize {
                expected,
                actual: terrain.len(),
            });
        }

        let is_terrain = |x: i32, y: i32| {
            x >= 0
                && y >= 0
                && x < width as i32
                && y < height as i32
                && terrain[(y as u32 * width + x as u32) as usize]
        };

        let mut result = AutotileResult {
            width,
            height,
            tiles: vec![None; expected],
            unmatched: Vec::new(),
        };

        for y in 0..height {
            for x in 0..width {
                let idx = (y * width + x) as usize;
                if !terrain[idx] {
                    continue;
                }

                let desired = wang_id_from_neighbors(color, |dx, dy| {
                    is_terrain(x as i32 + dx, y as i32 + dy)
                });
                let found = self.resolve(&desired)?;
                result.tiles[idx] = Some(found.tile_id);
                if !found.exact {
                    result.unmatched.push((x, y, desired));
                }
            }
        }

        if !result.unmatched.is_empty() {
            debug!(
                "wang set '{}': {} cells without an exact tile",
                self.wang_set().name,
                result.unmatched.len()
            );
        }
        Ok(result)
    }

    /// List the neighbour layouts of `color` that have no exact tile
    pub fn coverage(&self, color: u8) -> Result<CoverageReport, WangError> {
        self.check_colors(&WangId::filled(color), &FULL_MASK)?;

        let wang_set = self.wang_set();
        let positions = wang_set.set_type.positions();
        let layouts = neighbor_layouts(wang_set.set_type, color);

        let missing: Vec<WangId> = layouts
            .iter()
            .filter(|layout| {
                !self
                    .wang_tiles()
                    .any(|(_, id)| id.matching_positions(layout, positions) == positions.len())
            })
            .copied()
            .collect();

        Ok(CoverageReport {
            wangset: wang_set.name.clone(),
            color,
            required: layouts.len(),
            missing,
        })
    }
}
