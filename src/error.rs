//! Error types for scene loading and writing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the thistle I/O layer and scene validation
#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported file extension for {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to load OBJ file {path}: {source}")]
    ObjLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("Failed to parse scene file {path}: {source}")]
    SceneParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("Failed to serialize scene: {0}")]
    SceneSerialize(#[from] ron::Error),

    #[error("Invalid scene file: {0}")]
    InvalidScene(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Render backend error: {0}")]
    Render(String),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
