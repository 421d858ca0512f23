//! Tiled `.tsx` tileset reader
//!
//! Parses external tileset documents (Tiled 1.10/1.11) into
//! [`tilekit_core::Tileset`], including per-tile properties, collision object
//! groups and wang sets.
//!
//! # Example
//!
//! ```rust,ignore
//! use tilekit_tsx::load_tileset;
//!
//! let tileset = load_tileset("assets/tilesets/Darker_Grass_Tile_Layers.tsx")?;
//! let grass = tileset.wang_set("Unbenannter Satz").unwrap();
//! assert_eq!(grass.wang_tiles.len(), 58);
//! ```

mod error;
mod parse;
mod xml;

pub use error::TsxError;

use std::path::{Path, PathBuf};
use tilekit_core::{Tileset, TilesetCatalog};
use tracing::{debug, info, warn};

/// File extension of external tileset documents
pub const TSX_EXTENSION: &str = "tsx";

/// Parse a tileset from an XML string
pub fn parse_tileset(xml: &str) -> Result<Tileset, TsxError> {
    let root = xml::parse_document(xml)?;
    parse::tileset_from_element(&root)
}

/// Load a tileset from a `.tsx` file
pub fn load_tileset(path: impl AsRef<Path>) -> Result<Tileset, TsxError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| TsxError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let tileset = parse_tileset(&content)?;
    debug!(
        "loaded tileset '{}' from {} ({} tiles with metadata, {} wang sets)",
        tileset.name,
        path.display(),
        tileset.tiles.len(),
        tileset.wang_sets.len()
    );
    Ok(tileset)
}

/// Resolve an image `source` attribute relative to the tileset file that references it
pub fn resolve_source(tsx_path: &Path, source: &str) -> PathBuf {
    match tsx_path.parent() {
        Some(dir) => dir.join(source),
        None => PathBuf::from(source),
    }
}

/// Find every `.tsx` file below `dir`, sorted by path
pub fn find_tilesets(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, TsxError> {
    let mut found = Vec::new();
    collect_tilesets(dir.as_ref(), &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_tilesets(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), TsxError> {
    let io_err = |source| TsxError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_tilesets(&path, found)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(TSX_EXTENSION) {
            found.push(path);
        }
    }
    Ok(())
}

/// Load all tilesets below `dir` into a catalog.
///
/// Files that fail to load are logged and returned alongside the catalog so
/// callers can decide whether a partial load is acceptable.
pub fn load_catalog(
    dir: impl AsRef<Path>,
) -> Result<(TilesetCatalog, Vec<(PathBuf, TsxError)>), TsxError> {
    let mut catalog = TilesetCatalog::new();
    let mut failures = Vec::new();

    for path in find_tilesets(dir)? {
        match load_tileset(&path) {
            Ok(tileset) => {
                catalog.insert(tileset);
            }
            Err(e) => {
                warn!("failed to load {}: {}", path.display(), e);
                failures.push((path, e));
            }
        }
    }

    info!(
        "loaded {} tilesets ({} failed)",
        catalog.len(),
        failures.len()
    );
    Ok((catalog, failures))
}
