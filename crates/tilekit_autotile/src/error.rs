use thiserror::Error;
use tilekit_core::{ParseWangIdError, WangId};

/// Errors returned by wang tile resolution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WangError {
    #[error("wang set '{wangset}' has no tiles to choose from")]
    NoCandidates { wangset: String },
    #[error("wang set '{wangset}' has no tile for wang id {wang_id}")]
    NoExactMatch { wangset: String, wang_id: WangId },
    #[error("color {value} at position {position} exceeds the set's {max} colors")]
    InvalidColor { position: usize, value: u8, max: u8 },
    #[error("terrain grid has {actual} cells, expected {expected}")]
    GridSize { expected: usize, actual: usize },
    #[error(transparent)]
    ParseWangId(#[from] ParseWangIdError),
}
