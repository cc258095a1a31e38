// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod interval;
pub mod optics;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// Minimum hit distance accepted along a ray.
///
/// Rays spawned from a surface would otherwise re-intersect the surface
/// they start on. Also used as the grazing-discriminant threshold.
pub const FLOAT_EPS: f32 = 1e-4;
