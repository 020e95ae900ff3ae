//! Position-seeded grain noise.
//!
//! The noise value depends on the integer pixel position only, never on
//! time or frame count, so re-rendering an unchanged frame reproduces the
//! same grain. Integer hashing keeps the CPU and WGSL versions bit-exact.

/// PCG output permutation of a single `u32`.
#[inline]
pub const fn pcg_hash(v: u32) -> u32 {
    let state = v.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Noise in `[0, 1)` for pixel `(x, y)`.
///
/// Only the top 24 bits are used so the `f32` conversion is exact.
#[inline]
pub fn grain_noise(x: u32, y: u32) -> f32 {
    let h = pcg_hash(x ^ pcg_hash(y));
    (h >> 8) as f32 / 16_777_216.0
}
