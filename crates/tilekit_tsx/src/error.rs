use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading a `.tsx` document
#[derive(Debug, Error)]
pub enum TsxError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("XML error: {0}")]
    Xml(String),
    #[error("expected a <tileset> root element, found <{0}>")]
    UnexpectedRoot(String),
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },
    #[error("<{element}> attribute '{attribute}' has invalid value '{value}': {reason}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
        reason: String,
    },
    #[error("tile id {0} is declared more than once")]
    DuplicateTile(u32),
    #[error("wang set '{wangset}' lists tile {tile_id} more than once")]
    DuplicateWangTile { wangset: String, tile_id: u32 },
}
