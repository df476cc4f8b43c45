//! Error types for the edges of the toy: catalog loading and snapshots.
//! The simulation itself has no failure modes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse catalog: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("unknown toy '{0}'")]
    UnknownToy(String),
    #[error("unknown scene '{0}'")]
    UnknownScene(String),
    #[error("invalid color '{0}'")]
    Color(String),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("pixmap allocation failed ({0}x{1})")]
    Alloc(u32, u32),
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}
