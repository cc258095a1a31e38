//! Random sampling helpers.
//!
//! All randomness flows through `&mut dyn RngCore` so callers decide the
//! stream. Pixels get their own seeded stream to keep parallel renders
//! reproducible.

use glint_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Rejection-sample a point strictly inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = 2.0 * Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng)) - Vec3::ONE;
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Independent random stream for one pixel of one pass.
pub fn pixel_rng(seed: u64, pass: u32, index: u64) -> StdRng {
    // splitmix64 finalizer over the combined key
    let mut z = seed
        ^ (pass as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ index.wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    StdRng::seed_from_u64(z ^ (z >> 31))
}
