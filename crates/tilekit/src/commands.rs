//! Implementations of the `tilekit` subcommands
//!
//! Each command returns data; printing and exit codes are left to the binary.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tilekit_autotile::{AutotileResult, CoverageReport, WangError, WangMatch, WangResolver};
use tilekit_core::{ObjectHitbox, Tileset, TilesetCatalog, WangId};
use tilekit_schema::{validate_properties, validate_tileset, ValidationIssue};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Error;

/// Result of checking one file
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tileset: Option<String>,
    pub issues: Vec<ValidationIssue>,
    /// Load failure, when the file could not be read at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.issues.is_empty()
    }
}

fn load(path: &Path) -> Result<Tileset, Error> {
    tilekit_tsx::load_tileset(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick the wang set named on the command line, else the configured one, else the first
fn resolver<'a>(
    tileset: &'a Tileset,
    name: Option<&str>,
    config: &Config,
) -> Result<WangResolver<'a>, Error> {
    let name = name.or(config.wangset.as_deref());
    WangResolver::from_tileset(tileset, name).ok_or_else(|| Error::NoWangSet {
        tileset: tileset.name.clone(),
        name: name.map(str::to_string),
    })
}

/// Replace directories with the `.tsx` files below them
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(tilekit_tsx::find_tilesets(path)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Load and validate every tileset
pub fn check(paths: &[PathBuf], config: &Config) -> Result<Vec<CheckOutcome>, Error> {
    let files = expand_paths(paths)?;
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let outcome = match load(&path) {
            Ok(tileset) => {
                let mut issues = validate_tileset(&tileset);
                issues.extend(validate_properties(&tileset, &config.schema));
                CheckOutcome {
                    path,
                    tileset: Some(tileset.name),
                    issues,
                    error: None,
                }
            }
            Err(e) => {
                warn!("{}", e);
                CheckOutcome {
                    path,
                    tileset: None,
                    issues: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!("checked {} tilesets, {} with problems", outcomes.len(), failed);
    Ok(outcomes)
}

/// Resolve a wang id against a tileset's wang set.
///
/// With a seed, equally good tiles are chosen by probability; with `exact`,
/// anything but a full match is an error.
pub fn resolve(
    path: &Path,
    wang_id: &str,
    wangset: Option<&str>,
    exact: bool,
    seed: Option<u64>,
    config: &Config,
) -> Result<WangMatch, Error> {
    let desired: WangId = wang_id.parse().map_err(WangError::from)?;
    let tileset = load(path)?;
    let resolver = resolver(&tileset, wangset, config)?;

    let found = match seed {
        Some(seed) => resolver.resolve_weighted(&desired, &mut SmallRng::seed_from_u64(seed))?,
        None => resolver.resolve(&desired)?,
    };

    if exact && !found.exact {
        return Err(WangError::NoExactMatch {
            wangset: resolver.wang_set().name.clone(),
            wang_id: desired,
        }
        .into());
    }

    debug!("wang id {} -> tile {}", desired, found.tile_id);
    Ok(found)
}

/// Collision hitboxes of all object tiles, later files overriding earlier ids
pub fn hitboxes(paths: &[PathBuf], scale: f32) -> Result<BTreeMap<u32, ObjectHitbox>, Error> {
    let mut catalog = TilesetCatalog::new();
    for path in expand_paths(paths)? {
        catalog.insert(load(&path)?);
    }
    Ok(catalog.object_hitboxes(scale))
}

/// Report neighbour layouts without an exact tile
pub fn coverage(
    path: &Path,
    wangset: Option<&str>,
    color: u8,
    config: &Config,
) -> Result<CoverageReport, Error> {
    let tileset = load(path)?;
    let report = resolver(&tileset, wangset, config)?.coverage(color)?;
    Ok(report)
}

/// Parse a text grid: `#` marks terrain, `.` or space marks empty cells
pub fn parse_grid(text: &str) -> Result<(Vec<bool>, u32, u32), Error> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();

    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut cells = Vec::with_capacity(width * rows.len());

    for (y, row) in rows.iter().enumerate() {
        let mut count = 0;
        for (x, c) in row.chars().enumerate() {
            match c {
                '#' => cells.push(true),
                '.' | ' ' => cells.push(false),
                other => {
                    return Err(Error::Grid(format!(
                        "unexpected '{}' at row {}, column {}",
                        other,
                        y + 1,
                        x + 1
                    )))
                }
            }
            count += 1;
        }
        // Short rows are padded with empty cells
        cells.extend(std::iter::repeat(false).take(width - count));
    }

    Ok((cells, width as u32, rows.len() as u32))
}

/// Autotile a text grid with a tileset's wang set
pub fn fill(
    path: &Path,
    grid: &str,
    wangset: Option<&str>,
    color: u8,
    config: &Config,
) -> Result<AutotileResult, Error> {
    let (cells, width, height) = parse_grid(grid)?;
    let tileset = load(path)?;
    let result = resolver(&tileset, wangset, config)?.autotile_region(&cells, width, height, color)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit_core::ObjectKind;

    const GRASS: &str = include_str!("../../../assets/tilesets/Darker_Grass_Tile_Layers.tsx");
    const TREES: &str = include_str!("../../../assets/tilesets/trees_and_bushes.tsx");
    const OBJECTS: &str = include_str!("../../../assets/tilesets/objects.tsx");

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("grass.tsx"), GRASS).unwrap();
        std::fs::write(dir.path().join("trees.tsx"), TREES).unwrap();
        std::fs::write(dir.path().join("objects.tsx"), OBJECTS).unwrap();
        dir
    }

    #[test]
    fn test_check_directory() {
        let dir = workspace();
        std::fs::write(dir.path().join("broken.tsx"), "<tileset>").unwrap();

        let outcomes = check(&[dir.path().to_path_buf()], &Config::default()).unwrap();
        assert_eq!(outcomes.len(), 4);

        let broken: Vec<_> = outcomes.iter().filter(|o| !o.is_ok()).collect();
        assert_eq!(broken.len(), 1);
        assert!(broken[0].path.ends_with("broken.tsx"));
        assert!(broken[0].error.is_some());
    }

    #[test]
    fn test_check_flags_schema_issues() {
        let dir = workspace();
        let mut config = Config::default();
        config
            .schema
            .classes
            .get_mut("bush")
            .unwrap()
            .properties
            .push(tilekit_schema::PropertyDef::new("berries", tilekit_schema::PropType::Bool).required());

        let outcomes = check(&[dir.path().join("trees.tsx")], &config).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].tileset.as_deref(), Some("trees_and_bushes"));
        assert!(!outcomes[0].issues.is_empty());
        assert!(outcomes[0]
            .issues
            .iter()
            .all(|i| matches!(i, ValidationIssue::MissingProperty { property, .. } if property == "berries")));
    }

    #[test]
    fn test_resolve_command() {
        let dir = workspace();
        let grass = dir.path().join("grass.tsx");
        let config = Config::default();

        let found = resolve(&grass, "1,1,1,1,1,1,1,1", None, true, None, &config).unwrap();
        assert_eq!(found.tile_id, 12);

        let found = resolve(&grass, "0,0,0,0,0,0,0,0", None, false, None, &config).unwrap();
        assert_eq!(found.tile_id, 3);
        assert!(matches!(
            resolve(&grass, "0,0,0,0,0,0,0,0", None, true, None, &config),
            Err(Error::Wang(WangError::NoExactMatch { .. }))
        ));

        let found = resolve(&grass, "1,1,1,1,1,1,1,1", None, false, Some(3), &config).unwrap();
        assert!(found.exact);

        assert!(matches!(
            resolve(&grass, "1,1,1", None, false, None, &config),
            Err(Error::Wang(WangError::ParseWangId(_)))
        ));
        assert!(matches!(
            resolve(&grass, "1,1,1,1,1,1,1,1", Some("water"), false, None, &config),
            Err(Error::NoWangSet { .. })
        ));
        assert!(matches!(
            resolve(&dir.path().join("trees.tsx"), "1,1,1,1,1,1,1,1", None, false, None, &config),
            Err(Error::NoWangSet { name: None, .. })
        ));
    }

    const BAD_DATA: &str = r##"<tileset name="bad" tilewidth="8" tileheight="8" tilecount="4" columns="2">
  <tile id="0" probability="NaN"/>
  <tile id="1" probability="inf"/>
  <wangsets>
    <wangset name="g" type="corner" tile="-1">
      <wangcolor name="" color="#ff0000" tile="-1" probability="1"/>
      <wangtile tileid="0" wangid="0,1,0,1,0,1,0,1"/>
      <wangtile tileid="1" wangid="0,1,0,1,0,1,0,1"/>
      <wangtile tileid="2" wangid="0,1,0,1,0,1,0,0"/>
      <wangtile tileid="100" wangid="0,0,0,0,0,0,0,0"/>
    </wangset>
  </wangsets>
</tileset>"##;

    #[test]
    fn test_bad_probabilities_and_tile_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.tsx");
        std::fs::write(&path, BAD_DATA).unwrap();
        let config = Config::default();

        // Tiles 0 and 1 tie; neither has a usable weight, so the pick is uniform
        for seed in 0..20 {
            let found = resolve(&path, "1,1,1,1,1,1,1,1", None, true, Some(seed), &config).unwrap();
            assert!(found.tile_id < 2);
        }

        // Tile 100 is not part of the 4-tile atlas and is never returned
        let found = resolve(&path, "0,0,0,0,0,0,0,0", None, false, None, &config).unwrap();
        assert_eq!(found.tile_id, 2);
        assert!(matches!(
            resolve(&path, "0,0,0,0,0,0,0,0", None, true, None, &config),
            Err(Error::Wang(WangError::NoExactMatch { .. }))
        ));

        let outcomes = check(&[path], &config).unwrap();
        let issues = &outcomes[0].issues;
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| matches!(i, ValidationIssue::UnknownWangTile { tile_id: 100, .. })));
        assert_eq!(
            issues
                .iter()
                .filter(|i| matches!(i, ValidationIssue::InvalidProbability { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_hitboxes_command() {
        let dir = workspace();
        let boxes = hitboxes(
            &[dir.path().join("objects.tsx"), dir.path().join("trees.tsx")],
            4.0,
        )
        .unwrap();

        let small_tree = &boxes[&56];
        assert_eq!(small_tree.hitbox.x, 12.0);
        assert_eq!(small_tree.hitbox.y, 92.0);
        assert_eq!(small_tree.hitbox.width, 32.0);
        assert_eq!(small_tree.hitbox.height, 16.0);
        assert!(matches!(small_tree.kind, Some(ObjectKind::Tree { .. })));

        // The chicken has no collision group and falls back to its image
        let chicken = &boxes[&31];
        assert!(chicken.from_image);
        assert_eq!(chicken.hitbox.width, 44.0);

        let json = serde_json::to_string(&boxes).unwrap();
        assert!(json.contains("\"56\""));
    }

    #[test]
    fn test_coverage_command() {
        let dir = workspace();
        let report = coverage(&dir.path().join("grass.tsx"), None, 1, &Config::default()).unwrap();
        assert_eq!(report.required, 47);
        assert_eq!(report.missing, vec![WangId::EMPTY]);
    }

    #[test]
    fn test_parse_grid() {
        let (cells, width, height) = parse_grid("##.\n#\n\n").unwrap();
        assert_eq!((width, height), (3, 2));
        assert_eq!(cells, vec![true, true, false, true, false, false]);

        assert!(matches!(parse_grid("#x"), Err(Error::Grid(_))));
        assert_eq!(parse_grid("").unwrap(), (Vec::new(), 0, 0));
    }

    #[test]
    fn test_fill_command() {
        let dir = workspace();
        let result = fill(
            &dir.path().join("grass.tsx"),
            "###\n###\n###\n",
            None,
            1,
            &Config::default(),
        )
        .unwrap();
        assert_eq!(result.tile_at(1, 1), Some(12));
        assert!(result.is_exact());
    }
}
