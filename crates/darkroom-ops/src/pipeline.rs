//! CPU reference renderer for the full 17-stage pipeline.
//!
//! [`render_frame`] is the ground truth the GPU backend is checked against.
//! It never touches the source bitmap; every call recomputes the whole
//! frame from the source, the LUTs and the frame uniforms.
//!
//! # Example
//!
//! ```rust
//! use darkroom_core::Bitmap;
//! use darkroom_lut::LutSet;
//! use darkroom_ops::{render_frame, AdjustmentState, FrameUniforms};
//!
//! let src = Bitmap::filled(8, 8, [120, 80, 40, 255]).unwrap();
//! let frame = FrameUniforms::new(&AdjustmentState::default(), None);
//! let out = render_frame(&src, &LutSet::default(), &frame).unwrap();
//! assert_eq!(out, src);
//! ```

use darkroom_core::{Bitmap, clamp01};
use darkroom_lut::LutSet;
#[allow(unused_imports)]
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::brush::{composite, BrushDab, DabMode};
use crate::stages::{self, Rgb};
use crate::{AdjustmentState, OpsResult};

/// Everything a renderer needs for one frame besides the source and LUTs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameUniforms {
    /// Adjustment values, already clamped.
    pub adjustments: AdjustmentState,
    /// Active brush dab, if any.
    pub brush: Option<BrushDab>,
}

impl FrameUniforms {
    /// Builds frame uniforms, clamping every adjustment into range.
    pub fn new(adjustments: &AdjustmentState, brush: Option<BrushDab>) -> Self {
        Self { adjustments: adjustments.clamped(), brush }
    }
}

/// Quantizes a unit float to 8 bits, round to nearest.
#[inline]
pub fn to_u8(v: f32) -> u8 {
    (clamp01(v) * 255.0).round() as u8
}

#[inline]
fn rgb(t: [f32; 4]) -> Rgb {
    [t[0], t[1], t[2]]
}

#[inline]
fn add(a: Rgb, b: Rgb) -> Rgb {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Runs stages 1 to 16 for pixel `(x, y)`.
///
/// Out-of-bounds positions are clamped to the nearest edge pixel first, so
/// clone and heal lookups near the border are always defined.
pub fn adjust_pixel(source: &Bitmap, luts: &LutSet, adj: &AdjustmentState, x: i64, y: i64) -> Rgb {
    let (w, h) = source.dimensions();
    let x = x.clamp(0, w as i64 - 1);
    let y = y.clamp(0, h as i64 - 1);

    let centre = rgb(source.texel(x, y));
    let sum = add(
        add(rgb(source.texel(x, y - 1)), rgb(source.texel(x, y + 1))),
        add(rgb(source.texel(x + 1, y)), rgb(source.texel(x - 1, y))),
    );

    let mut c = stages::sharpen(centre, sum, adj.sharpening);
    c = stages::denoise(c, sum, adj.noise_reduction);
    c = stages::curves(c, luts);
    c = stages::saturation(c, adj.saturation);
    c = stages::brightness_contrast(c, adj.exposure, adj.contrast);
    c = stages::shadows_highlights(c, adj.shadows, adj.highlights);
    c = stages::whites_blacks(c, adj.whites, adj.blacks);
    c = stages::gamma(c, adj.gamma);
    c = stages::warmth(c, adj.warmth);
    c = stages::tint(c, adj.tint);
    c = stages::hue_rotate(c, adj.hue);
    c = stages::luminance(c, adj.luminance);
    c = stages::color_denoise(c, adj.color_noise_reduction);
    let uv = [(x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32];
    c = stages::vignette(c, uv, adj.vignette);
    c = stages::dehaze(c, adj.dehaze);
    stages::grain(c, x as u32, y as u32, adj.grain)
}

/// Stage 17 target colour for pixel `(x, y)`.
fn brush_target(source: &Bitmap, luts: &LutSet, adj: &AdjustmentState, dab: &BrushDab, x: i64, y: i64) -> Rgb {
    match dab.mode {
        DabMode::Paint => dab.color,
        DabMode::Clone { .. } => {
            let (dx, dy) = dab.clone_offset().unwrap_or((0, 0));
            adjust_pixel(source, luts, adj, x + dx, y + dy)
        }
        DabMode::Heal => {
            let r = dab.heal_reach();
            let sum = add(
                add(adjust_pixel(source, luts, adj, x - r, y), adjust_pixel(source, luts, adj, x + r, y)),
                add(adjust_pixel(source, luts, adj, x, y - r), adjust_pixel(source, luts, adj, x, y + r)),
            );
            [sum[0] * 0.25, sum[1] * 0.25, sum[2] * 0.25]
        }
    }
}

/// Full pipeline for one pixel; alpha comes straight from the source.
pub fn shade_pixel(source: &Bitmap, luts: &LutSet, frame: &FrameUniforms, x: u32, y: u32) -> [f32; 4] {
    let adj = &frame.adjustments;
    let (xi, yi) = (x as i64, y as i64);
    let mut c = adjust_pixel(source, luts, adj, xi, yi);

    if let Some(dab) = &frame.brush {
        let weight = dab.weight(x as f32, y as f32);
        if weight > 0.0 {
            c = composite(c, brush_target(source, luts, adj, dab, xi, yi), weight);
        }
    }

    let alpha = source.texel(xi, yi)[3];
    [c[0], c[1], c[2], alpha]
}

fn shade_row(source: &Bitmap, luts: &LutSet, frame: &FrameUniforms, y: u32, row: &mut [u8]) {
    for (x, px) in row.chunks_exact_mut(4).enumerate() {
        let [r, g, b, _] = shade_pixel(source, luts, frame, x as u32, y);
        px[0] = to_u8(r);
        px[1] = to_u8(g);
        px[2] = to_u8(b);
        // Alpha is copied, not re-quantized.
        px[3] = source.pixel(x as u32, y).map_or(255, |p| p[3]);
    }
}

/// Renders a full frame into a new bitmap the size of `source`.
pub fn render_frame(source: &Bitmap, luts: &LutSet, frame: &FrameUniforms) -> OpsResult<Bitmap> {
    let (w, h) = source.dimensions();
    let row_bytes = source.row_bytes();
    let mut data = vec![0u8; row_bytes * h as usize];

    trace!(width = w, height = h, brush = frame.brush.is_some(), "render_frame");

    #[cfg(feature = "parallel")]
    data.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| shade_row(source, luts, frame, y as u32, row));

    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| shade_row(source, luts, frame, y as u32, row));

    Ok(Bitmap::from_rgba8(w, h, data)?)
}
