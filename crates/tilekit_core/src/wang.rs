//! Wang set data (Tiled terrain sets)
//!
//! Matching and filling live in `tilekit_autotile`; this module only holds the
//! parsed data and index helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::value::Properties;

/// Number of positions in a Wang ID
pub const WANG_POSITIONS: usize = 8;

/// Type of wang set - determines which positions take part in matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WangSetType {
    /// 4 corners per tile
    Corner,
    /// 4 edges per tile
    Edge,
    /// 4 corners + 4 edges per tile
    #[default]
    Mixed,
}

impl WangSetType {
    /// Get the number of positions used by this set type
    pub fn position_count(&self) -> usize {
        self.positions().len()
    }

    /// Wang ID indices that take part in matching
    pub fn positions(&self) -> &'static [usize] {
        match self {
            WangSetType::Corner => &[1, 3, 5, 7],
            WangSetType::Edge => &[0, 2, 4, 6],
            WangSetType::Mixed => &[0, 1, 2, 3, 4, 5, 6, 7],
        }
    }

    /// Check whether an index is used by this set type
    pub fn uses_position(&self, index: usize) -> bool {
        self.positions().contains(&index)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WangSetType::Corner => "corner",
            WangSetType::Edge => "edge",
            WangSetType::Mixed => "mixed",
        }
    }
}

impl FromStr for WangSetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corner" => Ok(WangSetType::Corner),
            "edge" => Ok(WangSetType::Edge),
            "mixed" => Ok(WangSetType::Mixed),
            other => Err(format!("unknown wang set type '{}'", other)),
        }
    }
}

/// Named positions of a Wang ID, in Tiled's clockwise order starting at the top edge
///
/// ```text
///   7|0|1
///   6|X|2
///   5|4|3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WangPosition {
    Top = 0,
    TopRight = 1,
    Right = 2,
    BottomRight = 3,
    Bottom = 4,
    BottomLeft = 5,
    Left = 6,
    TopLeft = 7,
}

impl WangPosition {
    pub const ALL: [WangPosition; WANG_POSITIONS] = [
        WangPosition::Top,
        WangPosition::TopRight,
        WangPosition::Right,
        WangPosition::BottomRight,
        WangPosition::Bottom,
        WangPosition::BottomLeft,
        WangPosition::Left,
        WangPosition::TopLeft,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Neighbour offset `(dx, dy)` in map coordinates (y grows downward)
    pub fn offset(self) -> (i32, i32) {
        match self {
            WangPosition::Top => (0, -1),
            WangPosition::TopRight => (1, -1),
            WangPosition::Right => (1, 0),
            WangPosition::BottomRight => (1, 1),
            WangPosition::Bottom => (0, 1),
            WangPosition::BottomLeft => (-1, 1),
            WangPosition::Left => (-1, 0),
            WangPosition::TopLeft => (-1, -1),
        }
    }

    pub fn is_corner(self) -> bool {
        WangId::is_corner(self.index())
    }

    pub fn name(self) -> &'static str {
        match self {
            WangPosition::Top => "Top Edge",
            WangPosition::TopRight => "Top-Right Corner",
            WangPosition::Right => "Right Edge",
            WangPosition::BottomRight => "Bottom-Right Corner",
            WangPosition::Bottom => "Bottom Edge",
            WangPosition::BottomLeft => "Bottom-Left Corner",
            WangPosition::Left => "Left Edge",
            WangPosition::TopLeft => "Top-Left Corner",
        }
    }
}

/// Terrain color at each of the 8 positions; 0 = no terrain, 1.. = color index
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WangId(pub [u8; WANG_POSITIONS]);

/// Error returned when a `wangid` attribute is malformed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWangIdError(pub String);

impl fmt::Display for ParseWangIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid wang id: {}", self.0)
    }
}

impl std::error::Error for ParseWangIdError {}

impl WangId {
    pub const EMPTY: Self = WangId([0; WANG_POSITIONS]);

    /// Create a Wang ID with all positions set to one color
    pub const fn filled(color: u8) -> Self {
        WangId([color; WANG_POSITIONS])
    }

    pub fn get(&self, position: WangPosition) -> u8 {
        self.0[position.index()]
    }

    pub fn set(&mut self, position: WangPosition, color: u8) {
        self.0[position.index()] = color;
    }

    /// Highest color index used
    pub fn max_color(&self) -> u8 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Number of positions (among `positions`) where both ids agree
    pub fn matching_positions(&self, other: &WangId, positions: &[usize]) -> usize {
        positions
            .iter()
            .filter(|&&i| self.0[i] == other.0[i])
            .count()
    }

    /// Get opposite index (position on neighbor that faces us)
    pub fn opposite_index(i: usize) -> usize {
        (i + 4) % 8
    }

    /// Check if index is a corner (odd indices: 1,3,5,7)
    pub fn is_corner(i: usize) -> bool {
        i % 2 == 1
    }

    /// Get next index clockwise
    pub fn next_index(i: usize) -> usize {
        (i + 1) % 8
    }

    /// Get previous index counter-clockwise
    pub fn prev_index(i: usize) -> usize {
        (i + 7) % 8
    }
}

impl FromStr for WangId {
    type Err = ParseWangIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != WANG_POSITIONS {
            return Err(ParseWangIdError(format!(
                "expected {} comma-separated values, found {} in '{}'",
                WANG_POSITIONS,
                parts.len(),
                s
            )));
        }

        let mut colors = [0u8; WANG_POSITIONS];
        for (slot, part) in colors.iter_mut().zip(parts) {
            *slot = part
                .parse()
                .map_err(|_| ParseWangIdError(format!("'{}' is not a color index", part)))?;
        }
        Ok(WangId(colors))
    }
}

impl fmt::Display for WangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// A terrain color within a wang set (e.g., "Grass")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangColor {
    pub name: String,
    /// Display color as written in the document (`#rrggbb`)
    pub color: String,
    /// Representative tile, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<u32>,
    #[serde(default = "default_probability")]
    pub probability: f32,
}

fn default_probability() -> f32 {
    1.0
}

/// A named autotiling ruleset over a tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangSet {
    pub name: String,
    pub set_type: WangSetType,
    /// Representative tile, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<u32>,
    pub colors: Vec<WangColor>,
    /// Wang ID of every participating tile, ordered by tile id
    pub wang_tiles: BTreeMap<u32, WangId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

impl WangSet {
    pub fn new(name: impl Into<String>, set_type: WangSetType) -> Self {
        Self {
            name: name.into(),
            set_type,
            tile: None,
            colors: Vec::new(),
            wang_tiles: BTreeMap::new(),
            properties: Properties::new(),
        }
    }

    /// Number of terrain colors; valid color indices are `0..=color_count()`
    pub fn color_count(&self) -> u8 {
        self.colors.len().min(u8::MAX as usize) as u8
    }

    /// Add a color and return its 1-based index
    pub fn add_color(&mut self, color: WangColor) -> u8 {
        self.colors.push(color);
        self.color_count()
    }

    /// Get color by its 1-based index
    pub fn color(&self, index: u8) -> Option<&WangColor> {
        if index == 0 {
            return None;
        }
        self.colors.get(index as usize - 1)
    }

    pub fn set_wang_id(&mut self, tile_id: u32, wang_id: WangId) {
        self.wang_tiles.insert(tile_id, wang_id);
    }

    pub fn wang_id(&self, tile_id: u32) -> Option<&WangId> {
        self.wang_tiles.get(&tile_id)
    }

    /// Tiles carrying exactly this Wang ID, lowest id first
    pub fn tiles_with(&self, wang_id: &WangId) -> impl Iterator<Item = u32> + '_ {
        let wang_id = *wang_id;
        self.wang_tiles
            .iter()
            .filter(move |(_, id)| **id == wang_id)
            .map(|(&tile, _)| tile)
    }

    pub fn is_empty(&self) -> bool {
        self.wang_tiles.is_empty()
    }
}
