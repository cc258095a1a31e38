//! Pixel sampling, accumulation and output mapping.
//!
//! Implements:
//! - Jittered multi-sampling per pixel
//! - Per-pixel running sums across progressive passes
//! - NaN scrubbing, gamma correction (gamma = 2.0) and clamping

use crate::bucket::render_pass;
use crate::sampling::{gen_f32, pixel_rng};
use crate::{trace, Camera, Color, DisplaySink, Frame, Ray, Scene};
use glint_core::description::vec3;
use glint_core::{BackgroundDescription, RenderSettings};
use glint_math::Interval;
use rand::RngCore;
use std::time::Instant;

/// Default bound on the number of bounces.
pub const MAX_RECURSION_DEPTH: u32 = 20;

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Background {
    /// White at the horizon blending to sky blue overhead
    #[default]
    Sky,
    Solid(Color),
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

impl From<BackgroundDescription> for Background {
    fn from(description: BackgroundDescription) -> Self {
        match description {
            BackgroundDescription::Sky => Background::Sky,
            BackgroundDescription::Solid(color) => Background::Solid(vec3(color)),
        }
    }
}

/// Compute sky gradient background.
///
/// Degenerate or NaN directions see black.
fn sky_gradient(ray: &Ray) -> Color {
    if ray.is_degenerate() {
        return Color::ZERO;
    }
    let a = 0.5 * (ray.direction().y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Color of rays that escape the scene
    pub background: Background,
    /// Add local shading on rays leaving a Phong sphere from the inside
    pub shade_on_exit: bool,
    /// Branches whose accumulated weight drops below this are not traced.
    /// Zero follows every branch.
    pub min_weight: f32,
    /// Base seed of the per-pixel random streams
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 5,
            max_depth: MAX_RECURSION_DEPTH,
            background: Background::Sky,
            shade_on_exit: false,
            min_weight: 0.0,
            seed: 0,
        }
    }
}

impl From<&RenderSettings> for RenderConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            samples_per_pixel: settings.samples_per_pixel,
            max_depth: settings.max_depth,
            background: settings.background.into(),
            shade_on_exit: settings.shade_on_exit,
            min_weight: settings.min_weight,
            seed: settings.seed,
        }
    }
}

/// Running sum of the samples taken for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Accumulator {
    sum: Color,
    count: u32,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample.
    #[inline]
    pub fn add(&mut self, sample: Color) {
        self.sum += sample;
        self.count += 1;
    }

    /// Fold in the samples of another accumulator.
    #[inline]
    pub fn merge(&mut self, other: &Accumulator) {
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Average of the samples so far (black before the first sample).
    pub fn mean(&self) -> Color {
        if self.count == 0 {
            Color::ZERO
        } else {
            self.sum / self.count as f32
        }
    }

    /// Displayable value: NaN-free, gamma corrected and clamped.
    pub fn resolve(&self) -> Color {
        if self.count == 0 {
            return Color::ZERO;
        }
        let scrubbed = Color::new(
            scrub_nan(self.sum.x),
            scrub_nan(self.sum.y),
            scrub_nan(self.sum.z),
        );
        let scale = 1.0 / self.count as f32;
        Color::new(
            Interval::INTENSITY.clamp(linear_to_gamma(scale * scrubbed.x)),
            Interval::INTENSITY.clamp(linear_to_gamma(scale * scrubbed.y)),
            Interval::INTENSITY.clamp(linear_to_gamma(scale * scrubbed.z)),
        )
    }
}

#[inline]
fn scrub_nan(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize a resolved color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (256.0 * Interval::INTENSITY.clamp(c)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Row-major index of pixel (x, y), computed without 32-bit overflow.
#[inline]
pub(crate) fn pixel_index(width: u32, x: u32, y: u32) -> u64 {
    y as u64 * width as u64 + x as u64
}

/// Sample one pixel `samples_per_pixel` times.
///
/// Pixel (0, 0) is the top-left of the image. Each sample is jittered
/// uniformly within the pixel footprint.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Accumulator {
    let mut pixel = Accumulator::new();
    let row = (height - 1 - y) as f32;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width as f32;
        let t = (row + gen_f32(rng)) / height as f32;
        let ray = camera.get_ray(s, t);
        pixel.add(trace(&ray, scene, 0, config, rng));
    }

    pixel
}

/// Per-pixel accumulation buffer for a whole image.
#[derive(Debug, Clone, PartialEq)]
pub struct Film {
    width: u32,
    height: u32,
    pixels: Vec<Accumulator>,
    passes: u32,
}

impl Film {
    /// Create an empty film.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Accumulator::default(); width as usize * height as usize],
            passes: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Get the accumulator at (x, y).
    pub fn get(&self, x: u32, y: u32) -> &Accumulator {
        &self.pixels[pixel_index(self.width, x, y) as usize]
    }

    /// Merge new samples into the pixel at (x, y).
    pub fn accumulate(&mut self, x: u32, y: u32, samples: &Accumulator) {
        self.pixels[pixel_index(self.width, x, y) as usize].merge(samples);
    }

    pub(crate) fn finish_pass(&mut self) {
        self.passes += 1;
    }

    /// Resolve every pixel into a displayable frame.
    pub fn to_frame(&self) -> Frame {
        let pixels = self
            .pixels
            .iter()
            .map(|pixel| color_to_rgb8(pixel.resolve()))
            .collect();
        Frame::new(self.width, self.height, pixels)
    }
}

/// Render one pass over the image, in scanline order on the calling thread.
///
/// Produces the same samples as the bucketed parallel renderer.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig, film: &mut Film) {
    let pass = film.passes();
    let (width, height) = (film.width(), film.height());

    for y in 0..height {
        for x in 0..width {
            let mut rng = pixel_rng(config.seed, pass, pixel_index(width, x, y));
            let samples = render_pixel(camera, scene, x, y, width, height, config, &mut rng);
            film.accumulate(x, y, &samples);
        }
    }

    film.finish_pass();
}

/// Render `passes` parallel passes into `film`, presenting the accumulated
/// image to `sink` after each one.
pub fn render_progressive<S: DisplaySink>(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    film: &mut Film,
    passes: u32,
    bucket_size: u32,
    sink: &mut S,
) -> Result<(), S::Error> {
    log::info!(
        "Rendering {}x{}: {} passes of {} spp, max depth {}",
        film.width(),
        film.height(),
        passes,
        config.samples_per_pixel,
        config.max_depth
    );
    let start = Instant::now();

    for _ in 0..passes {
        let pass_start = Instant::now();
        render_pass(camera, scene, config, film, bucket_size);
        log::info!(
            "Pass {}/{} finished in {:.2?}",
            film.passes(),
            passes,
            pass_start.elapsed()
        );
        sink.present(&film.to_frame())?;
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(())
}
