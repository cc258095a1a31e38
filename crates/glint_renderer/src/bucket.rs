//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Every pixel draws from its own random
//! stream, so the result does not depend on how buckets are scheduled.

use crate::renderer::{pixel_index, render_pixel};
use crate::sampling::pixel_rng;
use crate::{Accumulator, Camera, Film, RenderConfig, Scene};
use rayon::prelude::*;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets covering the image, ordered from the center outward.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let distance = |b: &Bucket| {
        let dx = b.x as f32 + b.width as f32 / 2.0 - center_x;
        let dy = b.y as f32 + b.height as f32 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    // Stable sort keeps scanline order among equidistant buckets
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel samples in row-major order within the bucket
    pub pixels: Vec<Accumulator>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Accumulator>) -> Self {
        Self { bucket, pixels }
    }
}

/// Render one pass of a single bucket.
///
/// `image_width`/`image_height` are the full image dimensions.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    image_width: u32,
    image_height: u32,
    pass: u32,
    config: &RenderConfig,
) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            let mut rng = pixel_rng(config.seed, pass, pixel_index(image_width, x, y));
            pixels.push(render_pixel(
                camera,
                scene,
                x,
                y,
                image_width,
                image_height,
                config,
                &mut rng,
            ));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Render one pass over the whole image in parallel and fold it into `film`.
pub fn render_pass(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    film: &mut Film,
    bucket_size: u32,
) {
    let pass = film.passes();
    let (width, height) = (film.width(), film.height());
    let buckets = generate_buckets(width, height, bucket_size);

    log::debug!(
        "Pass {}: {} buckets of up to {}px",
        pass + 1,
        buckets.len(),
        bucket_size
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, camera, scene, width, height, pass, config);
            log::debug!("Bucket {} done at ({}, {})", bucket.index, bucket.x, bucket.y);
            result
        })
        .collect();

    for result in &results {
        let bucket = result.bucket;
        for (i, samples) in result.pixels.iter().enumerate() {
            let local_x = (i % bucket.width as usize) as u32;
            let local_y = (i / bucket.width as usize) as u32;
            film.accumulate(bucket.x + local_x, bucket.y + local_y, samples);
        }
    }

    film.finish_pass();
}
