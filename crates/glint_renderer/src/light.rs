//! Point lights and the Phong lighting term.

use crate::Color;
use glint_core::description::vec3;
use glint_core::{LightDescription, PhongCoefficients};
use glint_math::optics::reflect;
use glint_math::Vec3;

/// A point light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    color: Color,
    position: Vec3,
}

impl PointLight {
    pub fn new(color: Color, position: Vec3) -> Self {
        Self { color, position }
    }

    pub fn from_description(description: &LightDescription) -> Self {
        Self::new(vec3(description.color), vec3(description.position))
    }

    /// Ambient + diffuse + specular contribution of this light at `frag_pos`.
    ///
    /// `normal` is the outward unit normal and `view_dir` the unit direction
    /// of the incoming ray (eye toward surface).
    pub fn illuminate(
        &self,
        material: &PhongCoefficients,
        frag_pos: Vec3,
        normal: Vec3,
        view_dir: Vec3,
    ) -> Color {
        let ambient = self.color * material.ambient;

        let light_dir = (self.position - frag_pos).normalize_or_zero();
        let diff = normal.dot(light_dir).max(0.0);
        let diffuse = self.color * diff * material.diffuse;

        let reflect_dir = reflect(-light_dir, normal);
        let spec = (-view_dir).dot(reflect_dir).max(0.0).powf(material.exponent());
        let specular = self.color * spec * material.specular;

        ambient + diffuse + specular
    }
}
