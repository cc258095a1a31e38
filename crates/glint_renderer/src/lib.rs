//! Glint Renderer - recursive sphere ray tracing
//!
//! A Whitted-style ray tracer over spheres and point lights. Phong
//! surfaces combine local lighting with Fresnel-weighted reflection and
//! refraction; Lambertian, metal and dielectric surfaces scatter rays.
//! Samples are accumulated per pixel across progressive passes and
//! rendered in parallel buckets.

mod bucket;
mod camera;
mod integrator;
mod light;
mod material;
mod renderer;
pub mod sampling;
mod scene;
mod sink;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, render_pass, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use integrator::trace;
pub use light::PointLight;
pub use material::{Branch, Color, Material, Phong, Scatter};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, render, render_pixel, render_progressive, Accumulator,
    Background, Film, RenderConfig, MAX_RECURSION_DEPTH,
};
pub use scene::{Intersection, Scene};
pub use sink::{DisplaySink, Frame};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Interval, Ray, Vec3};
