//! Scene container and nearest-intersection search.
//!
//! The scene is a flat list of spheres searched linearly; scene sizes of a
//! few hundred spheres do not need an acceleration structure.

use crate::{Color, Material, PointLight, Ray, Sphere};
use glint_core::description::vec3;
use glint_core::{SceneDescription, SceneResult};
use glint_math::Vec3;

/// Record of the nearest ray-sphere intersection.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// The sphere that was hit
    pub sphere: &'a Sphere,
}

/// Spheres and lights, exclusively owned for the duration of a render.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    lights: Vec<PointLight>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the scene geometry and lights from a scene description.
    pub fn from_description(description: &SceneDescription) -> SceneResult<Self> {
        let mut scene = Self::new();
        for sphere in &description.spheres {
            let material = Material::from_description(&sphere.material)?;
            scene.add_sphere(Sphere::new(vec3(sphere.center), sphere.radius, material)?);
        }
        for light in &description.lights {
            scene.add_light(PointLight::from_description(light));
        }
        log::info!(
            "Built scene with {} spheres and {} lights",
            scene.spheres.len(),
            scene.lights.len()
        );
        Ok(scene)
    }

    /// Add a sphere. Insertion order decides ties between equally near hits.
    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Find the nearest sphere hit by `ray`.
    ///
    /// Equal distances resolve to the sphere inserted first.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let mut nearest: Option<(f32, &Sphere)> = None;

        for sphere in &self.spheres {
            if let Some(t) = sphere.hit_distance(ray) {
                if nearest.map_or(true, |(closest_so_far, _)| t < closest_so_far) {
                    nearest = Some((t, sphere));
                }
            }
        }

        nearest.map(|(t, sphere)| Intersection {
            t,
            point: ray.at(t),
            sphere,
        })
    }

    /// Sum of every light's Phong contribution at `point` on `sphere`.
    ///
    /// Surfaces without Phong coefficients receive no local light.
    pub fn shade(&self, sphere: &Sphere, point: Vec3, ray: &Ray) -> Color {
        let Some(material) = sphere.material().phong_coefficients() else {
            return Color::ZERO;
        };
        let normal = sphere.normal_at(point);

        self.lights
            .iter()
            .map(|light| light.illuminate(material, point, normal, ray.direction()))
            .fold(Color::ZERO, |acc, c| acc + c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::material::GOLD;
    use glint_core::SceneError;

    fn gray() -> Material {
        Material::lambertian(Color::splat(0.5))
    }

    #[test]
    fn test_nearest_sphere_wins() {
        let mut scene = Scene::new();
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, gray()).unwrap());
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, gray()).unwrap());

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = scene.intersect(&ray).unwrap();

        assert!((hit.t - 3.0).abs() < 1e-5);
        assert_eq!(hit.sphere.center(), Vec3::new(0.0, 0.0, -4.0));
        assert!((hit.point - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn test_ties_resolve_to_first_inserted() {
        let first = Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, gray()).unwrap();
        let second = Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, Material::metal(Color::ONE)).unwrap();

        let mut scene = Scene::new();
        scene.add_sphere(first);
        scene.add_sphere(second);

        let hit = scene.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert_eq!(*hit.sphere.material(), gray());
    }

    #[test]
    fn test_empty_scene_has_no_hit() {
        let scene = Scene::new();
        assert!(scene.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
    }

    #[test]
    fn test_shade_sums_lights() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, Material::phong(GOLD)).unwrap();
        let ray = Ray::through(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        let point = Vec3::Y;

        let mut scene = Scene::new();
        scene.add_light(PointLight::new(Color::ONE, Vec3::new(0.0, 10.0, 0.0)));
        let one = scene.shade(&sphere, point, &ray);

        scene.add_light(PointLight::new(Color::ONE, Vec3::new(0.0, 10.0, 0.0)));
        let two = scene.shade(&sphere, point, &ray);

        assert!(one.length() > 0.0);
        assert!((two - 2.0 * one).length() < 1e-5);
    }

    #[test]
    fn test_shade_ignores_scattering_materials() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray()).unwrap();
        let mut scene = Scene::new();
        scene.add_light(PointLight::new(Color::ONE, Vec3::new(0.0, 10.0, 0.0)));

        let ray = Ray::through(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        assert_eq!(scene.shade(&sphere, Vec3::Y, &ray), Color::ZERO);
    }

    #[test]
    fn test_from_description() {
        let scene = Scene::from_description(&SceneDescription::demo()).unwrap();
        assert_eq!(scene.spheres().len(), 4);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.spheres()[0].radius(), 100.0);

        let mut broken = SceneDescription::demo();
        broken.spheres[1].radius = -1.0;
        assert!(matches!(
            Scene::from_description(&broken),
            Err(SceneError::InvalidRadius(_))
        ));
    }
}
