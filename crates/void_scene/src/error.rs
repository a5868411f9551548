//! Error types for the scene model.

use std::path::PathBuf;

use thiserror::Error;

use crate::entity::ShapeKind;

/// Errors raised when mutating a single entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    /// A dimensions payload for one shape kind was applied to another.
    #[error("{given} dimensions cannot be applied to a {shape} entity")]
    DimensionsMismatch { shape: ShapeKind, given: ShapeKind },
}

/// Scene loading and saving errors.
#[derive(Debug, Error)]
pub enum SceneError {
    /// An imported mesh references a file that does not exist.
    #[error("mesh asset for '{name}' not found: {}", path.display())]
    AssetMissing { name: String, path: PathBuf },

    /// A persisted record is structurally valid JSON but not a usable entity.
    #[error("invalid entity record: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
