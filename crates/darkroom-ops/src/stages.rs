//! The per-pixel adjustment stages, in pipeline order.
//!
//! Each function takes an RGB triple already in `[0, 1]` and returns one
//! clamped to `[0, 1]`, so the output of any stage is a valid input for
//! the next. The WGSL fragment shader in `darkroom-gpu` mirrors these
//! functions line for line; keep the two in step.
//!
//! | # | stage                  | function                  |
//! |---|------------------------|---------------------------|
//! | 1 | sharpening             | [`sharpen`]               |
//! | 2 | noise reduction        | [`denoise`]               |
//! | 3 | curves                 | [`curves`]                |
//! | 4 | saturation             | [`saturation`]            |
//! | 5 | brightness / contrast  | [`brightness_contrast`]   |
//! | 6 | shadows / highlights   | [`shadows_highlights`]    |
//! | 7 | whites / blacks        | [`whites_blacks`]         |
//! | 8 | gamma                  | [`gamma`]                 |
//! | 9 | warmth                 | [`warmth`]                |
//! | 10| tint                   | [`tint`]                  |
//! | 11| hue rotation           | [`hue_rotate`]            |
//! | 12| luminance              | [`luminance`]             |
//! | 13| colour-noise reduction | [`color_denoise`]         |
//! | 14| vignette               | [`vignette`]              |
//! | 15| dehaze                 | [`dehaze`]                |
//! | 16| grain                  | [`grain`]                 |
//! | 17| brush overlay          | [`crate::brush::composite`] |

use darkroom_core::clamp01;
use darkroom_lut::LutSet;

/// RGB triple.
pub type Rgb = [f32; 3];

/// Rec. 601 luma weights.
pub const LUMA: Rgb = [0.299, 0.587, 0.114];

/// Rec. 601 luma of a colour.
#[inline]
pub fn luma(c: Rgb) -> f32 {
    c[0] * LUMA[0] + c[1] * LUMA[1] + c[2] * LUMA[2]
}

#[inline]
fn map(c: Rgb, f: impl Fn(f32) -> f32) -> Rgb {
    [clamp01(f(c[0])), clamp01(f(c[1])), clamp01(f(c[2]))]
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep between two edges.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = clamp01((x - edge0) / (edge1 - edge0));
    t * t * (3.0 - 2.0 * t)
}

/// Stage 1: unsharp mask against the four direct neighbours.
///
/// `neighbours_sum` is the sum of the north, south, east and west source
/// samples (edge-clamped).
#[inline]
pub fn sharpen(c: Rgb, neighbours_sum: Rgb, amount: f32) -> Rgb {
    let k = 1.0 + 4.0 * amount;
    [
        clamp01(c[0] * k - amount * neighbours_sum[0]),
        clamp01(c[1] * k - amount * neighbours_sum[1]),
        clamp01(c[2] * k - amount * neighbours_sum[2]),
    ]
}

/// Stage 2: blend toward the four-neighbour average.
#[inline]
pub fn denoise(c: Rgb, neighbours_sum: Rgb, amount: f32) -> Rgb {
    [
        clamp01(mix(c[0], neighbours_sum[0] * 0.25, amount)),
        clamp01(mix(c[1], neighbours_sum[1] * 0.25, amount)),
        clamp01(mix(c[2], neighbours_sum[2] * 0.25, amount)),
    ]
}

/// Stage 3: per-channel curves, then the combined curve.
#[inline]
pub fn curves(c: Rgb, luts: &LutSet) -> Rgb {
    map(luts.apply(c), |v| v)
}

/// Stage 4: blend between luma gray and the colour.
#[inline]
pub fn saturation(c: Rgb, amount: f32) -> Rgb {
    let gray = luma(c);
    map(c, |v| mix(gray, v, amount))
}

/// Stage 5: contrast around mid-gray plus an exposure offset.
#[inline]
pub fn brightness_contrast(c: Rgb, exposure: f32, contrast: f32) -> Rgb {
    map(c, |v| (v - 0.5) * contrast + 0.5 + exposure)
}

/// Stage 6: lift shadows by `(1 - L)^2` and highlights by `L^2`.
#[inline]
pub fn shadows_highlights(c: Rgb, shadows: f32, highlights: f32) -> Rgb {
    let l = luma(c);
    let dark = (1.0 - l) * (1.0 - l);
    let offset = shadows * dark + highlights * l * l;
    map(c, |v| v + offset)
}

/// Stage 7: whites scale with the value, blacks with its complement.
#[inline]
pub fn whites_blacks(c: Rgb, whites: f32, blacks: f32) -> Rgb {
    map(c, |v| v + whites * v + blacks * (1.0 - v))
}

/// Stage 8: `pow(c, 1 / gamma)`. Gamma 1 is an exact pass-through.
#[inline]
pub fn gamma(c: Rgb, gamma: f32) -> Rgb {
    if gamma == 1.0 {
        return c;
    }
    let inv = 1.0 / gamma;
    map(c, |v| v.max(0.0).powf(inv))
}

/// Stage 9: warm shifts red up and blue down.
#[inline]
pub fn warmth(c: Rgb, amount: f32) -> Rgb {
    [clamp01(c[0] + 0.1 * amount), c[1], clamp01(c[2] - 0.1 * amount)]
}

/// Stage 10: tint shifts green.
#[inline]
pub fn tint(c: Rgb, amount: f32) -> Rgb {
    [c[0], clamp01(c[1] + 0.1 * amount), c[2]]
}

/// Hue rotation matrix for `degrees`, rows in R, G, B order.
pub fn hue_matrix(degrees: f32) -> [Rgb; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

/// Stage 11: luma-preserving hue rotation.
#[inline]
pub fn hue_rotate(c: Rgb, degrees: f32) -> Rgb {
    if degrees == 0.0 {
        return c;
    }
    let m = hue_matrix(degrees);
    let row = |r: Rgb| clamp01(r[0] * c[0] + r[1] * c[1] + r[2] * c[2]);
    [row(m[0]), row(m[1]), row(m[2])]
}

/// Stage 12: uniform multiply.
#[inline]
pub fn luminance(c: Rgb, amount: f32) -> Rgb {
    map(c, |v| v * amount)
}

/// Stage 13: pull chroma toward luma gray.
#[inline]
pub fn color_denoise(c: Rgb, amount: f32) -> Rgb {
    let gray = luma(c);
    map(c, |v| mix(v, gray, amount))
}

/// Stage 14: radial darkening. `uv` is the pixel centre in `[0, 1]^2`.
#[inline]
pub fn vignette(c: Rgb, uv: [f32; 2], amount: f32) -> Rgb {
    let dx = uv[0] - 0.5;
    let dy = uv[1] - 0.5;
    let dist = (dx * dx + dy * dy).sqrt();
    let k = 1.0 - amount * smoothstep(0.25, 0.75, dist);
    map(c, |v| v * k)
}

/// Stage 15: add the dark channel back in.
#[inline]
pub fn dehaze(c: Rgb, amount: f32) -> Rgb {
    let dark = c[0].min(c[1]).min(c[2]);
    map(c, |v| v + amount * dark)
}

/// Stage 16: position-seeded film grain.
#[inline]
pub fn grain(c: Rgb, x: u32, y: u32, amount: f32) -> Rgb {
    let n = crate::grain::grain_noise(x, y) - 0.5;
    map(c, |v| v + amount * 0.2 * n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const C: Rgb = [0.2, 0.5, 0.8];

    fn assert_rgb(a: Rgb, b: Rgb) {
        for i in 0..3 {
            assert_relative_eq!(a[i], b[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn test_neutral_values_pass_through() {
        let sum = [C[0] * 4.0, C[1] * 4.0, C[2] * 4.0];
        assert_rgb(sharpen(C, sum, 0.0), C);
        assert_rgb(denoise(C, sum, 0.0), C);
        assert_rgb(curves(C, &LutSet::default()), C);
        assert_rgb(saturation(C, 1.0), C);
        assert_rgb(brightness_contrast(C, 0.0, 1.0), C);
        assert_rgb(shadows_highlights(C, 0.0, 0.0), C);
        assert_rgb(whites_blacks(C, 0.0, 0.0), C);
        assert_eq!(gamma(C, 1.0), C);
        assert_rgb(warmth(C, 0.0), C);
        assert_rgb(tint(C, 0.0), C);
        assert_eq!(hue_rotate(C, 0.0), C);
        assert_rgb(luminance(C, 1.0), C);
        assert_rgb(color_denoise(C, 0.0), C);
        assert_rgb(vignette(C, [0.0, 0.0], 0.0), C);
        assert_rgb(dehaze(C, 0.0), C);
        assert_rgb(grain(C, 3, 7, 0.0), C);
    }

    #[test]
    fn test_sharpen_flat_region_unchanged() {
        let sum = [C[0] * 4.0, C[1] * 4.0, C[2] * 4.0];
        assert_rgb(sharpen(C, sum, 1.0), C);
    }

    #[test]
    fn test_sharpen_boosts_peak() {
        let out = sharpen([0.5; 3], [0.0; 3], 0.25);
        assert_rgb(out, [1.0; 3]);
    }

    #[test]
    fn test_denoise_full_is_average() {
        assert_rgb(denoise([1.0; 3], [0.4, 0.8, 2.0], 1.0), [0.1, 0.2, 0.5]);
    }

    #[test]
    fn test_saturation_zero_is_gray() {
        let out = saturation(C, 0.0);
        let g = luma(C);
        assert_rgb(out, [g, g, g]);
    }

    #[test]
    fn test_contrast_and_exposure() {
        assert_rgb(brightness_contrast([0.75; 3], 0.0, 2.0), [1.0; 3]);
        assert_rgb(brightness_contrast([0.25; 3], 0.1, 2.0), [0.1; 3]);
        assert_rgb(brightness_contrast([0.5; 3], 0.0, 0.0), [0.5; 3]);
    }

    #[test]
    fn test_shadows_affect_darks_more() {
        let dark = shadows_highlights([0.1; 3], 0.5, 0.0);
        let light = shadows_highlights([0.9; 3], 0.5, 0.0);
        assert!(dark[0] - 0.1 > light[0] - 0.9);
    }

    #[test]
    fn test_gamma_brightens_midtones() {
        let out = gamma([0.25; 3], 2.0);
        assert_rgb(out, [0.5; 3]);
    }

    #[test]
    fn test_warmth_and_tint_channels() {
        assert_rgb(warmth(C, 1.0), [0.3, 0.5, 0.7]);
        assert_rgb(warmth(C, -1.0), [0.1, 0.5, 0.9]);
        assert_rgb(tint(C, -1.0), [0.2, 0.4, 0.8]);
    }

    #[test]
    fn test_hue_rotation_preserves_gray() {
        assert_rgb(hue_rotate([0.4; 3], 90.0), [0.4; 3]);
        assert_rgb(hue_rotate([0.4; 3], -135.0), [0.4; 3]);
    }

    #[test]
    fn test_hue_rotation_quarter_turn() {
        assert_rgb(hue_rotate(C, 90.0), [0.8, 0.3299, 0.7154]);
    }

    #[test]
    fn test_color_denoise_full_is_gray() {
        let g = luma(C);
        assert_rgb(color_denoise(C, 1.0), [g, g, g]);
    }

    #[test]
    fn test_vignette_centre_and_corner() {
        assert_rgb(vignette(C, [0.5, 0.5], 1.0), C);
        // Corner distance ~0.707 sits near the top of the falloff.
        let corner = vignette([1.0; 3], [0.0, 0.0], 1.0);
        assert!(corner[0] < 0.1);
    }

    #[test]
    fn test_dehaze_adds_dark_channel() {
        assert_rgb(dehaze(C, 1.0), [0.4, 0.7, 1.0]);
    }

    #[test]
    fn test_outputs_clamped() {
        let hot = [1.0; 3];
        assert_eq!(luminance(hot, 2.0), [1.0; 3]);
        assert_eq!(brightness_contrast([0.0; 3], -1.0, 2.0), [0.0; 3]);
        assert!(grain(hot, 1, 1, 1.0).iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
