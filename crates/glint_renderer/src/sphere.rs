//! Sphere primitive for ray tracing.

use crate::{Material, Ray};
use glint_core::{SceneError, SceneResult};
use glint_math::{Interval, Vec3, FLOAT_EPS};

/// A sphere with its surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive and finite.
    pub fn new(center: Vec3, radius: f32, material: Material) -> SceneResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SceneError::InvalidRadius(radius));
        }
        if !center.is_finite() {
            return Err(SceneError::InvalidSettings(format!(
                "sphere center {center} is not finite"
            )));
        }

        Ok(Self {
            center,
            radius,
            material,
        })
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Distance along `ray` to the nearest forward intersection.
    ///
    /// Uses the halved-b form of the quadratic: `a t² + 2 h t + c = 0` with
    /// `h = dot(oc, d)`, so the discriminant is `h² - a c`. Discriminants
    /// below `FLOAT_EPS` count as a miss, which also drops grazing tangent
    /// hits. Roots at or below `FLOAT_EPS` are ignored so that rays leaving
    /// the surface do not hit it again.
    pub fn hit_distance(&self, ray: &Ray) -> Option<f32> {
        if ray.is_degenerate() {
            return None;
        }

        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let h = oc.dot(ray.direction());
        let mut c = oc.length_squared() - self.radius * self.radius;
        // Origin on the surface: one root is exactly zero
        if c.abs() < FLOAT_EPS {
            c = 0.0;
        }

        let discriminant = h * h - a * c;
        if !(discriminant >= FLOAT_EPS) {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-h - sqrtd) / a;
        if !Interval::FORWARD.surrounds(root) {
            root = (-h + sqrtd) / a;
            if !Interval::FORWARD.surrounds(root) {
                return None;
            }
        }
        Some(root)
    }

    /// Outward unit normal at a surface point.
    #[inline]
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }

    /// True if `point` lies inside the sphere (or on its surface, within `FLOAT_EPS`).
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance(self.center) < self.radius + FLOAT_EPS
    }

    /// True if `ray` is travelling through the interior of this sphere.
    ///
    /// Rays spawned on the surface count as inside only when they head
    /// inward, since an outward ray has no forward hit left.
    pub fn ray_inside(&self, ray: &Ray) -> bool {
        self.contains(ray.origin()) && self.hit_distance(ray).is_some()
    }
}
