//! Wang adjacency resolution
//!
//! Picks the tile of a wang set whose wang id best matches a desired terrain
//! layout. Scoring counts matching positions (restricted to the positions the
//! set type uses and to an optional mask); ties go to the lowest tile id.

use rand::Rng;
use serde::Serialize;
use tilekit_core::{Tileset, WangId, WangSet, WANG_POSITIONS};

use crate::error::WangError;

/// Which positions of a wang id take part in matching
pub type WangMask = [bool; WANG_POSITIONS];

/// Mask that constrains every position
pub const FULL_MASK: WangMask = [true; WANG_POSITIONS];

/// Result of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WangMatch {
    pub tile_id: u32,
    /// Number of constrained positions the tile agrees with
    pub matched: usize,
    /// True when every constrained position agrees
    pub exact: bool,
}

/// Resolves terrain layouts against one wang set
#[derive(Debug, Clone, Copy)]
pub struct WangResolver<'a> {
    wang_set: &'a WangSet,
    /// Source of per-tile probabilities for weighted picks
    tileset: Option<&'a Tileset>,
}

impl<'a> WangResolver<'a> {
    pub fn new(wang_set: &'a WangSet) -> Self {
        Self {
            wang_set,
            tileset: None,
        }
    }

    /// Create a resolver that weights candidates by the tileset's tile probabilities
    pub fn with_tileset(tileset: &'a Tileset, wang_set: &'a WangSet) -> Self {
        Self {
            wang_set,
            tileset: Some(tileset),
        }
    }

    /// Look up a wang set of `tileset` by name, or take the first one
    pub fn from_tileset(tileset: &'a Tileset, name: Option<&str>) -> Option<Self> {
        let wang_set = match name {
            Some(name) => tileset.wang_set(name)?,
            None => tileset.wang_sets.first()?,
        };
        Some(Self::with_tileset(tileset, wang_set))
    }

    pub fn wang_set(&self) -> &'a WangSet {
        self.wang_set
    }

    /// Wang tiles eligible for resolution, in id order.
    ///
    /// With a tileset attached, tiles the tileset does not contain are skipped.
    pub fn wang_tiles(&self) -> impl Iterator<Item = (u32, &'a WangId)> + 'a {
        let tileset = self.tileset;
        self.wang_set
            .wang_tiles
            .iter()
            .map(|(&tile_id, wang_id)| (tile_id, wang_id))
            .filter(move |&(tile_id, _)| tileset.map_or(true, |ts| ts.contains_id(tile_id)))
    }

    /// Resolve against all positions used by the set type
    pub fn resolve(&self, desired: &WangId) -> Result<WangMatch, WangError> {
        self.resolve_masked(desired, &FULL_MASK)
    }

    /// Resolve counting only the positions set in `mask`
    pub fn resolve_masked(&self, desired: &WangId, mask: &WangMask) -> Result<WangMatch, WangError> {
        let best = self.best_candidates(desired, mask)?;
        // Candidates are collected in id order, the first one is the lowest id
        Ok(best.to_match(best.tiles[0]))
    }

    /// Resolve requiring every position to match
    pub fn resolve_exact(&self, desired: &WangId) -> Result<u32, WangError> {
        let found = self.resolve(desired)?;
        if found.exact {
            Ok(found.tile_id)
        } else {
            Err(WangError::NoExactMatch {
                wangset: self.wang_set.name.clone(),
                wang_id: *desired,
            })
        }
    }

    /// Resolve and pick among equally good tiles at random, weighted by probability.
    ///
    /// Zero-weight candidates are only picked when every candidate has zero weight.
    /// When the weights overflow, the pick falls back to uniform.
    pub fn resolve_weighted(
        &self,
        desired: &WangId,
        rng: &mut impl Rng,
    ) -> Result<WangMatch, WangError> {
        let best = self.best_candidates(desired, &FULL_MASK)?;
        // NaN, infinite and negative weights count as zero
        let weights: Vec<f32> = best
            .tiles
            .iter()
            .map(|&t| self.tile_weight(t))
            .map(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
            .collect();
        let total: f32 = weights.iter().sum();

        if !total.is_finite() || total <= 0.0 {
            let pick = rng.gen_range(0..best.tiles.len());
            return Ok(best.to_match(best.tiles[pick]));
        }

        let mut pick = rng.gen_range(0.0..total);
        for (&tile_id, &weight) in best.tiles.iter().zip(&weights) {
            if pick < weight {
                return Ok(best.to_match(tile_id));
            }
            pick -= weight;
        }

        // Float rounding can leave a sliver past the last weight
        let last = best
            .tiles
            .iter()
            .zip(&weights)
            .rev()
            .find(|&(_, &w)| w > 0.0)
            .map_or(best.tiles[best.tiles.len() - 1], |(&t, _)| t);
        Ok(best.to_match(last))
    }

    /// Relative probability of a tile: its own probability times the
    /// probability of every terrain color it shows
    pub fn tile_weight(&self, tile_id: u32) -> f32 {
        let tile_probability = self
            .tileset
            .and_then(|ts| ts.tile(tile_id))
            .map_or(1.0, |t| t.weight());

        let Some(wang_id) = self.wang_set.wang_id(tile_id) else {
            return tile_probability;
        };

        self.wang_set
            .set_type
            .positions()
            .iter()
            .filter_map(|&i| self.wang_set.color(wang_id.0[i]))
            .fold(tile_probability, |p, color| p * color.probability)
    }

    /// Check that every constrained color exists in the set
    pub fn check_colors(&self, desired: &WangId, mask: &WangMask) -> Result<(), WangError> {
        let max = self.wang_set.color_count();
        for &i in self.wang_set.set_type.positions() {
            let value = desired.0[i];
            if mask[i] && value > max {
                return Err(WangError::InvalidColor {
                    position: i,
                    value,
                    max,
                });
            }
        }
        Ok(())
    }

    fn best_candidates(&self, desired: &WangId, mask: &WangMask) -> Result<Candidates, WangError> {
        if self.wang_set.is_empty() {
            return Err(WangError::NoCandidates {
                wangset: self.wang_set.name.clone(),
            });
        }
        self.check_colors(desired, mask)?;

        let positions: Vec<usize> = self
            .wang_set
            .set_type
            .positions()
            .iter()
            .copied()
            .filter(|&i| mask[i])
            .collect();

        let mut best = Candidates {
            tiles: Vec::new(),
            matched: 0,
            constrained: positions.len(),
        };

        for (tile_id, wang_id) in self.wang_tiles() {
            let matched = wang_id.matching_positions(desired, &positions);
            if best.tiles.is_empty() || matched > best.matched {
                best.tiles.clear();
                best.tiles.push(tile_id);
                best.matched = matched;
            } else if matched == best.matched {
                best.tiles.push(tile_id);
            }
        }

        // Every wang tile lies outside the tileset
        if best.tiles.is_empty() {
            return Err(WangError::NoCandidates {
                wangset: self.wang_set.name.clone(),
            });
        }
        Ok(best)
    }
}

/// Tiles tied for the best score, in id order
struct Candidates {
    tiles: Vec<u32>,
    matched: usize,
    constrained: usize,
}

impl Candidates {
    fn to_match(&self, tile_id: u32) -> WangMatch {
        WangMatch {
            tile_id,
            matched: self.matched,
            exact: self.matched == self.constrained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use tilekit_core::{TileDef, WangColor, WangSetType};

    const GRASS: &str = include_str!("../../../assets/tilesets/Darker_Grass_Tile_Layers.tsx");

    /// The grass tileset with its wang set taken out
    fn grass() -> (Tileset, WangSet) {
        let mut tileset = tilekit_tsx::parse_tileset(GRASS).unwrap();
        let set = tileset.wang_sets.remove(0);
        (tileset, set)
    }

    fn red() -> WangColor {
        WangColor {
            name: String::new(),
            color: "#ff0000".to_string(),
            tile: None,
            probability: 1.0,
        }
    }

    #[test]
    fn test_grass_fixture_values() {
        let (_, set) = grass();
        assert_eq!(set.wang_tiles.len(), 58);
        for (&tile_id, wang_id) in &set.wang_tiles {
            assert!(tile_id < 77);
            assert!(wang_id.0.iter().all(|&c| c <= 1));
        }
    }

    #[test]
    fn test_full_terrain_prefers_lowest_id() {
        let (_, set) = grass();
        let resolver = WangResolver::new(&set);
        let found = resolver.resolve(&WangId::filled(1)).unwrap();
        assert_eq!(
            found,
            WangMatch {
                tile_id: 12,
                matched: 8,
                exact: true
            }
        );
    }

    #[test]
    fn test_every_listed_wang_id_resolves_exactly() {
        let (_, set) = grass();
        let resolver = WangResolver::new(&set);
        for (&tile_id, wang_id) in &set.wang_tiles {
            let lowest = set.tiles_with(wang_id).next().unwrap();
            assert_eq!(resolver.resolve_exact(wang_id), Ok(lowest));
            if *wang_id != WangId::filled(1) {
                assert_eq!(lowest, tile_id, "wang id {} is unique", wang_id);
            }
        }
    }

    #[test]
    fn test_closest_match_tie_break() {
        let (_, set) = grass();
        let resolver = WangResolver::new(&set);

        // No tile is fully empty; tiles 3, 25, 33 and 35 each differ in one position
        let found = resolver.resolve(&WangId::EMPTY).unwrap();
        assert_eq!(found.tile_id, 3);
        assert_eq!(found.matched, 7);
        assert!(!found.exact);

        assert_eq!(
            resolver.resolve_exact(&WangId::EMPTY),
            Err(WangError::NoExactMatch {
                wangset: set.name.clone(),
                wang_id: WangId::EMPTY
            })
        );
    }

    #[test]
    fn test_masked_resolution() {
        let (_, set) = grass();
        let resolver = WangResolver::new(&set);

        // Only the four edges count; tile 9 is the first with all edges filled
        let edges = [true, false, true, false, true, false, true, false];
        let found = resolver.resolve_masked(&WangId::filled(1), &edges).unwrap();
        assert_eq!(found.tile_id, 9);
        assert_eq!(found.matched, 4);
        assert!(found.exact);

        // An empty mask matches everything
        let found = resolver.resolve_masked(&WangId::EMPTY, &[false; 8]).unwrap();
        assert_eq!(found.tile_id, 0);
        assert!(found.exact);
    }

    #[test]
    fn test_invalid_color() {
        let (_, set) = grass();
        let resolver = WangResolver::new(&set);
        let desired = WangId([1, 1, 2, 1, 1, 1, 1, 1]);
        assert_eq!(
            resolver.resolve(&desired),
            Err(WangError::InvalidColor {
                position: 2,
                value: 2,
                max: 1
            })
        );

        // Unconstrained positions are not checked
        let mut mask = FULL_MASK;
        mask[2] = false;
        assert!(resolver.resolve_masked(&desired, &mask).is_ok());
    }

    #[test]
    fn test_empty_set_has_no_candidates() {
        let set = WangSet::new("empty", WangSetType::Corner);
        let resolver = WangResolver::new(&set);
        assert_eq!(
            resolver.resolve(&WangId::EMPTY),
            Err(WangError::NoCandidates {
                wangset: "empty".to_string()
            })
        );
    }

    #[test]
    fn test_set_type_limits_positions() {
        let mut set = WangSet::new("corners", WangSetType::Corner);
        set.add_color(red());
        // Edge values are ignored for corner sets
        set.set_wang_id(4, WangId([0, 1, 0, 1, 0, 1, 0, 1]));
        set.set_wang_id(7, WangId([1, 0, 1, 0, 1, 0, 1, 0]));

        let resolver = WangResolver::new(&set);
        let found = resolver.resolve(&WangId::filled(1)).unwrap();
        assert_eq!(found.tile_id, 4);
        assert_eq!(found.matched, 4);
        assert!(found.exact);
    }

    #[test]
    fn test_weighted_only_returns_tied_tiles() {
        let (tileset, set) = grass();
        let resolver = WangResolver::with_tileset(&tileset, &set);
        let mut rng = SmallRng::seed_from_u64(0);

        let mut base = 0;
        for _ in 0..1000 {
            let found = resolver.resolve_weighted(&WangId::filled(1), &mut rng).unwrap();
            assert!(found.exact);
            assert!(set.tiles_with(&WangId::filled(1)).any(|t| t == found.tile_id));
            if found.tile_id == 12 {
                base += 1;
            }
        }
        // Tile 12 weighs 1.0 against twelve variants at 0.01
        assert!(base > 800, "tile 12 picked {} times", base);

        // A unique wang id always yields its tile
        let found = resolver.resolve_weighted(&WangId([0, 0, 1, 1, 1, 0, 0, 0]), &mut rng);
        assert_eq!(found.map(|m| m.tile_id), Ok(0));
    }

    #[test]
    fn test_weighted_with_zero_weights() {
        let mut tileset = Tileset::new("t", 8, 8, 4, 2);
        let mut set = WangSet::new("s", WangSetType::Edge);
        set.add_color(red());
        for id in 0..3 {
            set.set_wang_id(id, WangId::filled(1));
            let mut tile = TileDef::new(id);
            tile.probability = Some(if id == 2 { 1.0 } else { 0.0 });
            tileset.insert_tile(tile);
        }

        let resolver = WangResolver::with_tileset(&tileset, &set);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let found = resolver.resolve_weighted(&WangId::filled(1), &mut rng).unwrap();
            assert_eq!(found.tile_id, 2);
        }

        // All zero: any tied tile may be chosen
        tileset.tiles.get_mut(&2).unwrap().probability = Some(0.0);
        let resolver = WangResolver::with_tileset(&tileset, &set);
        let found = resolver.resolve_weighted(&WangId::filled(1), &mut rng).unwrap();
        assert!(found.tile_id < 3);
    }

    #[test]
    fn test_weighted_ignores_non_finite_probabilities() {
        let mut tileset = Tileset::new("t", 8, 8, 4, 2);
        let mut set = WangSet::new("s", WangSetType::Corner);
        set.add_color(red());
        for id in 0..3 {
            set.set_wang_id(id, WangId::filled(1));
        }
        let probabilities = [f32::NAN, f32::INFINITY, 1.0];
        for (id, &p) in probabilities.iter().enumerate() {
            let mut tile = TileDef::new(id as u32);
            tile.probability = Some(p);
            tileset.insert_tile(tile);
        }

        let resolver = WangResolver::with_tileset(&tileset, &set);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..50 {
            let found = resolver.resolve_weighted(&WangId::filled(1), &mut rng).unwrap();
            assert_eq!(found.tile_id, 2);
        }

        // Finite weights whose sum overflows fall back to a uniform pick
        for (id, tile) in tileset.tiles.iter_mut() {
            tile.probability = Some(if *id == 0 { f32::NAN } else { f32::MAX });
        }
        let resolver = WangResolver::with_tileset(&tileset, &set);
        for _ in 0..50 {
            let found = resolver.resolve_weighted(&WangId::filled(1), &mut rng).unwrap();
            assert!(found.tile_id < 3);
        }
    }

    #[test]
    fn test_tiles_outside_tileset_are_skipped() {
        let mut tileset = Tileset::new("t", 8, 8, 4, 2);
        let mut set = WangSet::new("s", WangSetType::Corner);
        set.add_color(red());
        set.set_wang_id(1, WangId([0, 1, 0, 1, 0, 1, 0, 0]));
        set.set_wang_id(100, WangId::EMPTY);
        tileset.wang_sets.push(set.clone());

        // Without a tileset the out-of-range tile is an exact match
        assert_eq!(WangResolver::new(&set).resolve_exact(&WangId::EMPTY), Ok(100));

        let resolver = WangResolver::from_tileset(&tileset, None).unwrap();
        let found = resolver.resolve(&WangId::EMPTY).unwrap();
        assert_eq!(found.tile_id, 1);
        assert!(found.tile_id < tileset.tile_count);
        assert!(!found.exact);
        assert_eq!(resolver.wang_tiles().count(), 1);

        let mut only_outside = WangSet::new("outside", WangSetType::Corner);
        only_outside.add_color(red());
        only_outside.set_wang_id(100, WangId::EMPTY);
        assert_eq!(
            WangResolver::with_tileset(&tileset, &only_outside).resolve(&WangId::EMPTY),
            Err(WangError::NoCandidates {
                wangset: "outside".to_string()
            })
        );
    }

    #[test]
    fn test_tile_weight_includes_color_probability() {
        let (tileset, mut set) = grass();
        assert_eq!(WangResolver::with_tileset(&tileset, &set).tile_weight(55), 0.01);
        assert_eq!(WangResolver::new(&set).tile_weight(55), 1.0);

        set.colors[0].probability = 0.5;
        let resolver = WangResolver::with_tileset(&tileset, &set);
        // Tile 3 shows the color at one position only
        assert_eq!(resolver.tile_weight(3), 0.5);
        assert_eq!(resolver.tile_weight(12), 0.5f32.powi(8));
    }

    #[test]
    fn test_from_tileset() {
        let (mut tileset, set) = grass();
        assert!(WangResolver::from_tileset(&tileset, None).is_none());
        tileset.wang_sets.push(set);
        assert!(WangResolver::from_tileset(&tileset, None).is_some());
        assert!(WangResolver::from_tileset(&tileset, Some("Unbenannter Satz")).is_some());
        assert!(WangResolver::from_tileset(&tileset, Some("water")).is_none());
    }
}
