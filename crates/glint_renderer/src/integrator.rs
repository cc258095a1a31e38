//! Recursive ray tracing.
//!
//! A ray is followed to its nearest hit. Scattering materials continue
//! along each of their branches; Phong surfaces add their lit color and a
//! Fresnel-weighted blend of the reflected and refracted rays. Recursion
//! stops at `RenderConfig::max_depth`.

use crate::{Color, Material, Phong, Ray, RenderConfig, Scene};
use crate::scene::Intersection;
use glint_math::optics::{reflect, refract};
use rand::RngCore;

/// Compute the color seen along `ray`.
///
/// `depth` counts bounces already taken; a fresh camera ray starts at 0.
pub fn trace(ray: &Ray, scene: &Scene, depth: u32, config: &RenderConfig, rng: &mut dyn RngCore) -> Color {
    trace_weighted(ray, scene, depth, 1.0, config, rng)
}

/// `throughput` is the largest weight the caller will apply to the result;
/// branches that would fall below `config.min_weight` are not followed.
fn trace_weighted(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    throughput: f32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth >= config.max_depth {
        return Color::ZERO;
    }

    let Some(hit) = scene.intersect(ray) else {
        return config.background.color(ray);
    };

    match hit.sphere.material() {
        Material::Phong(phong) => trace_phong(ray, scene, &hit, phong, depth, throughput, config, rng),
        material => {
            let Some(scatter) = material.scatter(ray, hit.sphere, hit.t, rng) else {
                return Color::ZERO;
            };

            let mut color = Color::ZERO;
            for branch in scatter.branches() {
                let weight = throughput * branch.weight.max_element();
                if weight < config.min_weight {
                    continue;
                }
                color += branch.weight * trace_weighted(&branch.ray, scene, depth + 1, weight, config, rng);
            }
            color
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn trace_phong(
    ray: &Ray,
    scene: &Scene,
    hit: &Intersection<'_>,
    phong: &Phong,
    depth: u32,
    throughput: f32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let point = hit.point;
    let direction = ray.direction();

    // Travelling inside the sphere: flip the normal and swap the media
    let inside = hit.sphere.ray_inside(ray);
    let outward_normal = hit.sphere.normal_at(point);
    let normal = if inside { -outward_normal } else { outward_normal };

    let mut color = Color::ZERO;
    if !inside || config.shade_on_exit {
        color += phong.shade * scene.shade(hit.sphere, point, ray);
    }

    let ior = phong.coefficients.ior;
    let (current_index, next_index) = if inside { (ior, 1.0) } else { (1.0, ior) };
    let refracted = refract(direction, normal, current_index / next_index);

    let cos_incident = (-direction.dot(normal)).clamp(0.0, 1.0);
    let (k_reflect, k_refract) = phong.split(cos_incident, inside, refracted.is_some());

    if throughput * k_reflect >= config.min_weight && k_reflect > 0.0 {
        let reflected = Ray::new(point, reflect(direction, normal));
        color += k_reflect
            * trace_weighted(&reflected, scene, depth + 1, throughput * k_reflect, config, rng);
    }

    if let Some(refracted) = refracted {
        if throughput * k_refract >= config.min_weight && k_refract > 0.0 {
            let refracted = Ray::new(point, refracted);
            color += k_refract
                * trace_weighted(&refracted, scene, depth + 1, throughput * k_refract, config, rng);
        }
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Background, PointLight, Sphere};
    use glint_core::material::{GLASS, GOLD};
    use glint_core::FresnelBlend;
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn exact_config(background: Background) -> RenderConfig {
        RenderConfig {
            background,
            min_weight: 0.0,
            ..Default::default()
        }
    }

    fn single_sphere_at_origin(material: Material) -> Scene {
        let mut scene = Scene::new();
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, material).unwrap());
        scene
    }

    fn single_sphere(material: Material) -> Scene {
        let mut scene = Scene::new();
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, material).unwrap());
        scene
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = single_sphere(Material::lambertian(Color::splat(0.5)));
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.2));

        let sky = exact_config(Background::Sky);
        assert_eq!(trace(&ray, &scene, 0, &sky, &mut rng), Background::Sky.color(&ray));

        let solid = exact_config(Background::Solid(Color::new(0.1, 0.2, 0.3)));
        assert_eq!(trace(&ray, &scene, 0, &solid, &mut rng), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_zero_depth_is_black() {
        let mut scene = single_sphere(Material::phong(GOLD));
        scene.add_light(PointLight::new(Color::ONE, Vec3::new(0.0, 10.0, 0.0)));
        let config = RenderConfig {
            max_depth: 0,
            ..exact_config(Background::Solid(Color::ONE))
        };
        let mut rng = StdRng::seed_from_u64(0);

        for direction in [Vec3::NEG_Z, Vec3::Y, Vec3::new(0.2, -0.1, -1.0)] {
            let ray = Ray::new(Vec3::ZERO, direction);
            assert_eq!(trace(&ray, &scene, 0, &config, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_lambertian_against_sky() {
        // The scattered ray leaves the sphere and the scene is otherwise empty
        let albedo = Color::new(0.8, 0.3, 0.3);
        let background = Color::new(0.5, 0.7, 1.0);
        let scene = single_sphere(Material::lambertian(albedo));
        let config = exact_config(Background::Solid(background));
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        for _ in 0..50 {
            let color = trace(&ray, &scene, 0, &config, &mut rng);
            assert!((color - albedo * background).length() < 1e-6, "{color}");
        }
    }

    #[test]
    fn test_default_config_follows_dim_bounces() {
        // No pruning unless asked for: even a very dark surface passes its share
        let albedo = Color::splat(5e-4);
        let background = Color::new(0.5, 0.7, 1.0);
        let scene = single_sphere(Material::lambertian(albedo));
        let config = RenderConfig {
            background: Background::Solid(background),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        let color = trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &scene, 0, &config, &mut rng);
        assert!((color - albedo * background).length() < 1e-9, "{color}");
    }

    #[test]
    fn test_metal_reflects_background_behind_camera() {
        let albedo = Color::new(0.9, 0.8, 0.7);
        let scene = single_sphere(Material::metal(albedo));
        let config = exact_config(Background::Sky);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let reflected = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let expected = albedo * Background::Sky.color(&reflected);
        let color = trace(&ray, &scene, 0, &config, &mut rng);
        assert!((color - expected).length() < 1e-5);
    }

    #[test]
    fn test_dielectric_conserves_uniform_background() {
        // Reflected and refracted weights always sum to one
        let background = Color::new(0.25, 0.5, 0.75);
        let scene = single_sphere(Material::dielectric(1.5));
        let config = exact_config(Background::Solid(background));
        let mut rng = StdRng::seed_from_u64(0);

        for direction in [Vec3::NEG_Z, Vec3::new(0.3, 0.1, -3.0), Vec3::new(-0.2, 0.25, -3.0)] {
            let color = trace(&Ray::new(Vec3::ZERO, direction), &scene, 0, &config, &mut rng);
            assert!((color - background).length() < 1e-4, "{direction}: {color}");
        }
    }

    #[test]
    fn test_phong_without_lights_sees_through_glass() {
        // Schlick blend on a clear path: reflection escapes the same as refraction
        let background = Color::splat(0.5);
        let scene = single_sphere(Material::phong(GLASS));
        let config = exact_config(Background::Solid(background));
        let mut rng = StdRng::seed_from_u64(0);

        let color = trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &scene, 0, &config, &mut rng);
        assert!((color - background).length() < 1e-4, "{color}");
    }

    #[test]
    fn test_phong_local_term() {
        // Opaque fixed blend: only the lit color remains
        let phong = Phong::new(GOLD).with_blend(FresnelBlend::Fixed { reflect: 0.0, refract: 0.0 });
        let mut scene = single_sphere(Material::Phong(phong));
        scene.add_light(PointLight::new(Color::ONE, Vec3::new(0.0, 0.0, 10.0)));
        let config = exact_config(Background::Solid(Color::ZERO));
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = scene.intersect(&ray).unwrap();
        let expected = scene.shade(hit.sphere, hit.point, &ray);
        let color = trace(&ray, &scene, 0, &config, &mut rng);
        assert!((color - expected).length() < 1e-6);
        assert!(color.length() > 0.0);
    }

    #[test]
    fn test_total_internal_reflection_inside_phong_glass() {
        // Leaving glass at 64 degrees from the normal: everything reflects
        let glass = Sphere::new(Vec3::ZERO, 1.0, Material::phong(GLASS)).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.9, 0.0), Vec3::X);

        let mut lone = Scene::new();
        lone.add_sphere(glass);
        let exit = lone.intersect(&ray).unwrap();
        let inward = -glass.normal_at(exit.point);
        assert!(refract(ray.direction(), inward, GLASS.ior).is_none());
        let reflected = Ray::new(exit.point, reflect(ray.direction(), inward));

        // A lit opaque bead inside the glass, on the reflected path only
        let bead = Phong::new(GOLD).with_blend(FresnelBlend::Fixed { reflect: 0.0, refract: 0.0 });
        let mut scene = Scene::new();
        scene.add_sphere(glass);
        scene.add_sphere(Sphere::new(reflected.at(0.4), 0.05, Material::Phong(bead)).unwrap());
        scene.add_light(PointLight::new(Color::ONE, Vec3::new(10.0, 10.0, 10.0)));

        let bead_hit = scene.intersect(&reflected).unwrap();
        assert_eq!(*bead_hit.sphere.material(), Material::Phong(bead));
        let expected = scene.shade(bead_hit.sphere, bead_hit.point, &reflected);
        assert!(expected.length() > 0.0);

        let config = exact_config(Background::Solid(Color::new(0.2, 0.9, 0.4)));
        let mut rng = StdRng::seed_from_u64(0);
        let color = trace(&ray, &scene, 0, &config, &mut rng);
        assert!((color - expected).length() < 1e-5, "{color} vs {expected}");
    }

    #[test]
    fn test_refraction_out_of_phong_glass_bends_away_from_normal() {
        // Only the transmitted ray contributes; the sky gradient records its direction
        let phong = Phong::new(GLASS).with_blend(FresnelBlend::Fixed { reflect: 0.0, refract: 1.0 });
        let scene = single_sphere_at_origin(Material::Phong(phong));
        let config = exact_config(Background::Sky);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::new(0.0, 0.3, 0.0), Vec3::X);
        let exit_point = Vec3::new(0.91f32.sqrt(), 0.3, 0.0);
        let normal = exit_point;

        // Snell from glass to air: sin(t) = 1.5 * sin(i)
        let sin_t: f32 = 1.5 * 0.3;
        let cos_t = (1.0 - sin_t * sin_t).sqrt();
        let tangent = (ray.direction() - ray.direction().dot(normal) * normal).normalize();
        let expected_dir = cos_t * normal + sin_t * tangent;
        assert!(expected_dir.y < -0.1);

        let expected = Background::Sky.color(&Ray::new(exit_point, expected_dir));
        let color = trace(&ray, &scene, 0, &config, &mut rng);
        assert!((color - expected).length() < 1e-4, "{color} vs {expected}");
    }

    #[test]
    fn test_shade_on_exit() {
        // A glass sphere seen from inside: the local term only appears when enabled
        let phong = Phong::new(GLASS).with_blend(FresnelBlend::Fixed { reflect: 0.0, refract: 0.0 });
        let mut scene = Scene::new();
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, Material::Phong(phong)).unwrap());
        scene.add_light(PointLight::new(Color::ONE, Vec3::new(0.0, 10.0, 0.0)));
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let suppressed = exact_config(Background::Solid(Color::ZERO));
        assert_eq!(trace(&ray, &scene, 0, &suppressed, &mut rng), Color::ZERO);

        let enabled = RenderConfig {
            shade_on_exit: true,
            ..suppressed.clone()
        };
        let color = trace(&ray, &scene, 0, &enabled, &mut rng);
        assert!(color.length() > 0.0);
    }

    #[test]
    fn test_min_weight_prunes_branches() {
        let scene = single_sphere(Material::dielectric(1.5));
        let background = Color::ONE;
        let mut rng = StdRng::seed_from_u64(0);

        // Reflection at normal incidence carries 4%, refraction the rest
        let pruned = RenderConfig {
            min_weight: 0.05,
            ..exact_config(Background::Solid(background))
        };
        let color = trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &scene, 0, &pruned, &mut rng);
        assert!(color.x < 0.97 && color.x > 0.5, "{color}");
    }
}
