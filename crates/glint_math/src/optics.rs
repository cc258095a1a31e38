//! Reflection, refraction and Fresnel helpers.

use crate::Vec3;

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with normal `n`.
///
/// `eta` is the ratio of the incident index over the transmitted index.
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(v: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = n.dot(v);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some(eta * v - (eta * cos_i + k.sqrt()) * n)
}

/// Schlick's approximation for reflectance
#[inline]
pub fn schlick(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
