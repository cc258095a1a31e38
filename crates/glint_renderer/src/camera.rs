//! Camera for ray generation.

use crate::Ray;
use glint_core::description::vec3;
use glint_core::{CameraDescription, SceneError, SceneResult};
use glint_math::Vec3;

/// Pinhole camera mapping normalized image coordinates to world rays.
///
/// `(s, t) = (0, 0)` is the lower-left corner of the image plane and
/// `(1, 1)` the upper-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Create a camera at `look_from` facing `look_at`.
    ///
    /// - `vup`: Approximate up direction, must not be parallel to the view direction
    /// - `vfov`: Vertical field of view in degrees, in (0, 180)
    /// - `aspect`: Image width over height
    pub fn new(look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32, aspect: f32) -> SceneResult<Self> {
        if !(vfov > 0.0 && vfov < 180.0) {
            return Err(SceneError::InvalidCamera(format!(
                "vertical field of view must be in (0, 180) degrees, got {vfov}"
            )));
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(SceneError::InvalidCamera(format!(
                "aspect ratio must be positive, got {aspect}"
            )));
        }

        // Calculate camera basis vectors
        let w = (look_from - look_at).try_normalize().ok_or_else(|| {
            SceneError::InvalidCamera("look_from and look_at coincide".into())
        })?;
        let u = vup.cross(w).try_normalize().ok_or_else(|| {
            SceneError::InvalidCamera("up vector is parallel to the view direction".into())
        })?;
        let v = w.cross(u);

        // Calculate viewport dimensions
        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = aspect * half_height;

        Ok(Self {
            origin: look_from,
            lower_left_corner: look_from - half_width * u - half_height * v - w,
            horizontal: 2.0 * half_width * u,
            vertical: 2.0 * half_height * v,
        })
    }

    pub fn from_description(description: &CameraDescription, aspect: f32) -> SceneResult<Self> {
        Self::new(
            vec3(description.look_from),
            vec3(description.look_at),
            vec3(description.up),
            description.vfov,
            aspect,
        )
    }

    /// Generate the ray through image-plane coordinates `(s, t)`.
    #[inline]
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        Ray::through(
            self.origin,
            self.lower_left_corner + s * self.horizontal + t * self.vertical,
        )
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn lower_left_corner(&self) -> Vec3 {
        self.lower_left_corner
    }

    pub fn horizontal(&self) -> Vec3 {
        self.horizontal
    }

    pub fn vertical(&self) -> Vec3 {
        self.vertical
    }
}
