//! Glint Core - scene description, material catalog and errors.
//!
//! This crate provides:
//!
//! - **Scene description**: serde types for sphere/light/camera scene files
//! - **Material catalog**: named Phong presets with their lookup coefficients
//! - **Errors**: construction-time validation failures
//!
//! # Example
//!
//! ```ignore
//! use glint_core::SceneDescription;
//!
//! let scene = SceneDescription::load("scenes/demo.json")?;
//! println!("{} spheres, {} lights", scene.spheres.len(), scene.lights.len());
//! ```

pub mod description;
pub mod error;
pub mod material;

// Re-export commonly used types
pub use description::{
    BackgroundDescription, CameraDescription, ImageSettings, LightDescription,
    MaterialDescription, RenderSettings, SceneDescription, SphereDescription,
};
pub use error::{SceneError, SceneResult};
pub use material::{find_preset, FresnelBlend, PhongCoefficients, PRESETS};
