use std::path::PathBuf;
use thiserror::Error;
use tilekit_autotile::WangError;
use tilekit_schema::SchemaError;
use tilekit_tsx::TsxError;

use crate::config::ConfigError;

/// Errors surfaced by the `tilekit` commands
#[derive(Debug, Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: TsxError,
    },
    #[error(transparent)]
    Tsx(#[from] TsxError),
    #[error(transparent)]
    Wang(#[from] WangError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tileset '{tileset}' has no wang set{}", .name.as_ref().map(|n| format!(" named '{}'", n)).unwrap_or_default())]
    NoWangSet {
        tileset: String,
        name: Option<String>,
    },
    #[error("invalid terrain grid: {0}")]
    Grid(String),
}
