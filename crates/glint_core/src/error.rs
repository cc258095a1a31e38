//! Errors raised while building a scene.
//!
//! Nothing here can happen mid-trace: tracing degrades to "no contribution"
//! instead of failing, so every variant is a construction-time check.

use thiserror::Error;

/// Errors that can occur while loading or validating a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("Unknown material preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid material: {0}")]
    InvalidMaterial(String),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;
