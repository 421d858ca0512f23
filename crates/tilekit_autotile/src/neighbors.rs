//! Wang ids derived from a cell's 8 neighbours
//!
//! A terrain cell takes the terrain color on every edge whose neighbour is also
//! terrain. Corners need the corner neighbour and both adjacent edge neighbours,
//! which keeps the number of distinct layouts at 47 for a mixed set.

use tilekit_core::{WangId, WangPosition, WangSetType, WANG_POSITIONS};

/// Build the wang id of a cell from its neighbours.
///
/// `is_terrain(dx, dy)` reports whether the neighbour at that offset carries
/// the terrain; y grows downward.
pub fn wang_id_from_neighbors<F>(color: u8, is_terrain: F) -> WangId
where
    F: Fn(i32, i32) -> bool,
{
    let mut wang_id = WangId::EMPTY;
    for position in WangPosition::ALL {
        let (dx, dy) = position.offset();
        if is_terrain(dx, dy) {
            wang_id.set(position, color);
        }
    }
    reduce_corners(wang_id)
}

/// Clear every corner whose adjacent edges do not both carry the corner's color
pub fn reduce_corners(wang_id: WangId) -> WangId {
    let mut result = wang_id;
    for i in (1..WANG_POSITIONS).step_by(2) {
        let color = wang_id.0[i];
        let prev = wang_id.0[WangId::prev_index(i)];
        let next = wang_id.0[WangId::next_index(i)];
        if prev != color || next != color {
            result.0[i] = 0;
        }
    }
    result
}

/// Keep only the positions a set type uses
pub fn project(wang_id: WangId, set_type: WangSetType) -> WangId {
    let mut result = WangId::EMPTY;
    for &i in set_type.positions() {
        result.0[i] = wang_id.0[i];
    }
    result
}

/// Every distinct neighbour layout for one terrain color, sorted
pub fn neighbor_layouts(set_type: WangSetType, color: u8) -> Vec<WangId> {
    let mut layouts: Vec<WangId> = (0u16..256)
        .map(|bits| {
            let mut wang_id = WangId::EMPTY;
            for (i, slot) in wang_id.0.iter_mut().enumerate() {
                if bits & (1 << i) != 0 {
                    *slot = color;
                }
            }
            project(reduce_corners(wang_id), set_type)
        })
        .collect();
    layouts.sort();
    layouts.dedup();
    layouts
}
