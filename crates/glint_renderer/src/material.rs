//! Surface materials.
//!
//! Materials are a closed set dispatched through one `match`. The
//! scattering variants (`Lambertian`, `Metal`, `Dielectric`) continue a ray
//! through [`Material::scatter`]; `Phong` surfaces are lit by the scene's
//! point lights and blended with Fresnel weights by the integrator.

use crate::sampling::random_in_unit_sphere;
use crate::{Ray, Sphere};
use glint_core::description::vec3;
use glint_core::{find_preset, FresnelBlend, MaterialDescription, PhongCoefficients, SceneError, SceneResult};
use glint_math::optics::{reflect, refract, schlick};
use glint_math::Vec3;
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Phong shading coefficients plus the weights of the recursive terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phong {
    pub coefficients: PhongCoefficients,
    /// Weight of the local (lit) term
    pub shade: f32,
    pub blend: FresnelBlend,
}

impl Phong {
    pub fn new(coefficients: PhongCoefficients) -> Self {
        Self {
            coefficients,
            shade: 1.0,
            blend: FresnelBlend::Schlick,
        }
    }

    pub fn with_shade(mut self, shade: f32) -> Self {
        self.shade = shade;
        self
    }

    pub fn with_blend(mut self, blend: FresnelBlend) -> Self {
        self.blend = blend;
        self
    }

    /// Weights of the reflected and refracted rays.
    ///
    /// `cos_incident` is measured against the normal facing the ray. Without
    /// a real refraction everything the blend would transmit is either sent
    /// to reflection (Schlick, R = 1) or dropped (fixed weights).
    pub fn split(&self, cos_incident: f32, exiting: bool, can_refract: bool) -> (f32, f32) {
        match self.blend {
            FresnelBlend::Schlick if can_refract => {
                let ior = self.coefficients.ior;
                let r = schlick(fresnel_cosine(cos_incident, ior, exiting), ior);
                (r, 1.0 - r)
            }
            FresnelBlend::Schlick => (1.0, 0.0),
            FresnelBlend::Fixed { reflect, refract } => {
                (reflect, if can_refract { refract } else { 0.0 })
            }
        }
    }
}

/// One continuation of a scattered ray and the weight applied to its color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    pub ray: Ray,
    pub weight: Color,
}

impl Branch {
    pub fn new(ray: Ray, weight: Color) -> Self {
        Self { ray, weight }
    }
}

/// Result of scattering: one ray, or a reflected/refracted pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    primary: Branch,
    secondary: Option<Branch>,
}

impl Scatter {
    pub fn single(branch: Branch) -> Self {
        Self {
            primary: branch,
            secondary: None,
        }
    }

    pub fn split(reflected: Branch, refracted: Branch) -> Self {
        Self {
            primary: reflected,
            secondary: Some(refracted),
        }
    }

    /// Outgoing branches in order (reflected first for a split).
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        std::iter::once(&self.primary).chain(self.secondary.as_ref())
    }
}

/// Surface material of a sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse surface
    Lambertian { albedo: Color },
    /// Perfect mirror
    Metal { albedo: Color },
    /// Glass-like surface with index of refraction `ior`
    Dielectric { ior: f32 },
    /// Point-light shaded surface with Fresnel-weighted reflection and refraction
    Phong(Phong),
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Self::Lambertian { albedo }
    }

    pub fn metal(albedo: Color) -> Self {
        Self::Metal { albedo }
    }

    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn dielectric(ior: f32) -> Self {
        Self::Dielectric { ior }
    }

    pub fn phong(coefficients: PhongCoefficients) -> Self {
        Self::Phong(Phong::new(coefficients))
    }

    /// Phong material from the named catalog preset.
    pub fn preset(name: &str) -> SceneResult<Self> {
        find_preset(name)
            .map(Self::phong)
            .ok_or_else(|| SceneError::UnknownPreset(name.to_string()))
    }

    /// Build and validate a material from its scene-file description.
    pub fn from_description(description: &MaterialDescription) -> SceneResult<Self> {
        let material = match description {
            MaterialDescription::Lambertian { albedo } => Self::lambertian(vec3(*albedo)),
            MaterialDescription::Metal { albedo } => Self::metal(vec3(*albedo)),
            MaterialDescription::Dielectric { ior } => Self::dielectric(*ior),
            MaterialDescription::Phong {
                ambient,
                diffuse,
                specular,
                shininess,
                ior,
                shade,
                blend,
            } => Self::Phong(
                Phong::new(PhongCoefficients::new(
                    vec3(*ambient),
                    vec3(*diffuse),
                    vec3(*specular),
                    *shininess,
                    *ior,
                ))
                .with_shade(*shade)
                .with_blend(*blend),
            ),
            MaterialDescription::Preset { name, shade, blend } => {
                let mut phong = Phong::new(
                    find_preset(name).ok_or_else(|| SceneError::UnknownPreset(name.clone()))?,
                );
                if let Some(shade) = shade {
                    phong = phong.with_shade(*shade);
                }
                if let Some(blend) = blend {
                    phong = phong.with_blend(*blend);
                }
                Self::Phong(phong)
            }
        };
        material.validate()?;
        Ok(material)
    }

    fn validate(&self) -> SceneResult<()> {
        let ior = match self {
            Self::Dielectric { ior } => *ior,
            Self::Phong(phong) => phong.coefficients.ior,
            Self::Lambertian { .. } | Self::Metal { .. } => return Ok(()),
        };
        if ior > 0.0 && ior.is_finite() {
            Ok(())
        } else {
            Err(SceneError::InvalidMaterial(format!(
                "index of refraction must be positive, got {ior}"
            )))
        }
    }

    /// Phong coefficients, if this surface is lit by point lights.
    pub fn phong_coefficients(&self) -> Option<&PhongCoefficients> {
        match self {
            Self::Phong(phong) => Some(&phong.coefficients),
            _ => None,
        }
    }

    /// Scatter an incoming ray that hit `sphere` at distance `t`.
    ///
    /// The material's contribution is the weighted sum of the colors seen
    /// along the returned branches. Returns `None` for `Phong`, which the
    /// integrator shades directly.
    pub fn scatter(&self, ray_in: &Ray, sphere: &Sphere, t: f32, rng: &mut dyn RngCore) -> Option<Scatter> {
        let point = ray_in.at(t);
        let normal = sphere.normal_at(point);

        match self {
            Self::Lambertian { albedo } => {
                let mut direction = normal + random_in_unit_sphere(rng);
                // Catch degenerate scatter direction
                if direction.length_squared() < 1e-8 {
                    direction = normal;
                }
                Some(Scatter::single(Branch::new(Ray::new(point, direction), *albedo)))
            }
            Self::Metal { albedo } => {
                let reflected = reflect(ray_in.direction(), normal);
                Some(Scatter::single(Branch::new(Ray::new(point, reflected), *albedo)))
            }
            Self::Dielectric { ior } => Some(dielectric_scatter(ray_in.direction(), point, normal, *ior)),
            Self::Phong(_) => None,
        }
    }
}

fn dielectric_scatter(direction: Vec3, point: Vec3, outward_normal: Vec3, ior: f32) -> Scatter {
    let exiting = direction.dot(outward_normal) > 0.0;
    let (normal, eta) = if exiting {
        (-outward_normal, ior)
    } else {
        (outward_normal, 1.0 / ior)
    };
    let cos_incident = -direction.dot(normal);

    let reflected = Ray::new(point, reflect(direction, normal));
    match refract(direction, normal, eta) {
        None => Scatter::single(Branch::new(reflected, Color::ONE)),
        Some(refracted) => {
            let r = schlick(fresnel_cosine(cos_incident, ior, exiting), ior);
            Scatter::split(
                Branch::new(reflected, Color::splat(r)),
                Branch::new(Ray::new(point, refracted), Color::splat(1.0 - r)),
            )
        }
    }
}

/// Cosine fed to Schlick's approximation.
///
/// Leaving the medium, the angle on the outer side of the interface is used.
#[inline]
fn fresnel_cosine(cos_incident: f32, ior: f32, exiting: bool) -> f32 {
    if exiting {
        (1.0 - ior * ior * (1.0 - cos_incident * cos_incident)).max(0.0).sqrt()
    } else {
        cos_incident
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::material::{GLASS, GOLD};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere(material: Material) -> Sphere {
        Sphere::new(Vec3::ZERO, 1.0, material).unwrap()
    }

    fn down_ray() -> Ray {
        Ray::through(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO)
    }

    #[test]
    fn test_lambertian_scatter() {
        let albedo = Color::new(0.8, 0.3, 0.3);
        let sphere = sphere(Material::lambertian(albedo));
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let scatter = sphere.material().scatter(&down_ray(), &sphere, 4.0, &mut rng).unwrap();
            assert_eq!(scatter.branches().count(), 1);
            let branch = scatter.branches().next().unwrap();
            assert_eq!(branch.weight, albedo);
            assert!((branch.ray.origin() - Vec3::Y).length() < 1e-5);
            // normal + point in unit sphere never points below the tangent plane
            assert!(branch.ray.direction().y >= 0.0);
        }
    }

    #[test]
    fn test_metal_mirrors_about_normal() {
        let albedo = Color::new(0.7, 0.6, 0.5);
        let sphere = sphere(Material::metal(albedo));
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::through(Vec3::new(-1.0, 2.0, 0.0), Vec3::Y);
        let t = sphere.hit_distance(&ray).unwrap();
        let scatter = sphere.material().scatter(&ray, &sphere, t, &mut rng).unwrap();
        let branch = scatter.branches().next().unwrap();

        assert_eq!(branch.weight, albedo);
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((branch.ray.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_dielectric_splits_energy() {
        let sphere = sphere(Material::dielectric(1.5));
        let mut rng = StdRng::seed_from_u64(0);

        let scatter = sphere.material().scatter(&down_ray(), &sphere, 4.0, &mut rng).unwrap();
        assert_eq!(scatter.branches().count(), 2);

        let branches: Vec<_> = scatter.branches().collect();
        let (reflected, refracted) = (branches[0], branches[1]);
        // Normal incidence: R = R0 = 0.04
        assert!((reflected.weight.x - 0.04).abs() < 1e-5);
        assert!((reflected.weight + refracted.weight - Color::ONE).length() < 1e-5);
        assert!((reflected.ray.direction() - Vec3::Y).length() < 1e-5);
        assert!((refracted.ray.direction() - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let sphere = sphere(Material::dielectric(1.5));
        let mut rng = StdRng::seed_from_u64(0);

        // Inside the sphere, hitting the surface at a grazing angle
        let origin = Vec3::new(0.0, -0.95, 0.0);
        let ray = Ray::new(origin, Vec3::new(1.0, 0.05, 0.0));
        let t = sphere.hit_distance(&ray).unwrap();
        let scatter = sphere.material().scatter(&ray, &sphere, t, &mut rng).unwrap();

        assert_eq!(scatter.branches().count(), 1);
        let branch = scatter.branches().next().unwrap();
        assert_eq!(branch.weight, Color::ONE);
        // Reflected back into the sphere
        assert!(sphere.contains(branch.ray.at(0.01)));
    }

    #[test]
    fn test_phong_does_not_scatter() {
        let sphere = sphere(Material::phong(GOLD));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sphere.material().scatter(&down_ray(), &sphere, 4.0, &mut rng).is_none());
    }

    #[test]
    fn test_phong_split() {
        let glass = Phong::new(GLASS);
        let (r, t) = glass.split(1.0, false, true);
        assert!((r - 0.04).abs() < 1e-5);
        assert!((r + t - 1.0).abs() < 1e-6);
        assert_eq!(glass.split(0.2, true, false), (1.0, 0.0));

        let fixed = glass.with_blend(FresnelBlend::Fixed { reflect: 0.3, refract: 0.5 });
        assert_eq!(fixed.split(0.7, false, true), (0.3, 0.5));
        assert_eq!(fixed.split(0.7, true, false), (0.3, 0.0));
    }

    #[test]
    fn test_from_description() {
        let material = Material::from_description(&MaterialDescription::Preset {
            name: "glass".into(),
            shade: Some(0.5),
            blend: None,
        })
        .unwrap();
        assert_eq!(material, Material::Phong(Phong::new(GLASS).with_shade(0.5)));

        let unknown = Material::from_description(&MaterialDescription::preset("obsidian"));
        assert!(matches!(unknown, Err(SceneError::UnknownPreset(name)) if name == "obsidian"));

        let bad_ior = Material::from_description(&MaterialDescription::Dielectric { ior: 0.0 });
        assert!(matches!(bad_ior, Err(SceneError::InvalidMaterial(_))));
    }
}
