//! Brush dab uniforms and the final compositing stage.
//!
//! The editor's brush tool reduces its state machine to at most one
//! [`BrushDab`] per frame. Every renderer composites that dab after the
//! sixteen adjustment stages.

use darkroom_core::clamp01;

use crate::stages::Rgb;

/// How the dab picks its target colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DabMode {
    /// Blend toward the flat brush colour.
    Paint,
    /// Blend toward the adjusted pixel at `p + offset` (image pixels).
    Clone {
        /// Source position minus brush centre.
        offset: [f32; 2],
    },
    /// Blend toward the mean of four adjusted neighbours a quarter radius
    /// away.
    Heal,
}

impl DabMode {
    /// Numeric tag shared with the shader (`0` means no dab).
    pub const fn tag(&self) -> u32 {
        match self {
            DabMode::Paint => 1,
            DabMode::Clone { .. } => 2,
            DabMode::Heal => 3,
        }
    }
}

/// One brush application, in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushDab {
    /// Centre of the dab.
    pub center: [f32; 2],
    /// Radius in pixels (> 0).
    pub radius: f32,
    /// Peak blend weight at the centre.
    pub opacity: f32,
    /// Flat colour used by [`DabMode::Paint`].
    pub color: Rgb,
    /// Target selection.
    pub mode: DabMode,
}

impl BrushDab {
    /// Blend weight at integer pixel `(x, y)`: `opacity * (1 - d / radius)`
    /// inside the radius, zero outside.
    #[inline]
    pub fn weight(&self, x: f32, y: f32) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let dx = x - self.center[0];
        let dy = y - self.center[1];
        let dist = (dx * dx + dy * dy).sqrt();
        if dist >= self.radius {
            return 0.0;
        }
        clamp01(self.opacity) * (1.0 - dist / self.radius)
    }

    /// Pixel offset of the clone source, rounded to whole pixels.
    pub fn clone_offset(&self) -> Option<(i64, i64)> {
        match self.mode {
            DabMode::Clone { offset } => Some((offset[0].round() as i64, offset[1].round() as i64)),
            _ => None,
        }
    }

    /// Heal sampling distance: a quarter of the radius, at least one pixel.
    pub fn heal_reach(&self) -> i64 {
        ((self.radius / 4.0).round() as i64).max(1)
    }
}

/// Stage 17: blend `c` toward `target` by `weight`.
#[inline]
pub fn composite(c: Rgb, target: Rgb, weight: f32) -> Rgb {
    [
        clamp01(c[0] * (1.0 - weight) + target[0] * weight),
        clamp01(c[1] * (1.0 - weight) + target[1] * weight),
        clamp01(c[2] * (1.0 - weight) + target[2] * weight),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dab(mode: DabMode) -> BrushDab {
        BrushDab { center: [50.0, 50.0], radius: 20.0, opacity: 0.8, color: [1.0; 3], mode }
    }

    #[test]
    fn test_weight_falloff() {
        let d = dab(DabMode::Paint);
        assert_relative_eq!(d.weight(50.0, 50.0), 0.8);
        assert_relative_eq!(d.weight(60.0, 50.0), 0.4, epsilon = 1e-6);
        assert_eq!(d.weight(70.0, 50.0), 0.0);
        assert_eq!(d.weight(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_offsets() {
        let d = dab(DabMode::Clone { offset: [-10.4, 3.6] });
        assert_eq!(d.clone_offset(), Some((-10, 4)));
        assert_eq!(dab(DabMode::Heal).clone_offset(), None);
        assert_eq!(dab(DabMode::Heal).heal_reach(), 5);
        let tiny = BrushDab { radius: 1.0, ..dab(DabMode::Heal) };
        assert_eq!(tiny.heal_reach(), 1);
    }

    #[test]
    fn test_composite() {
        assert_eq!(composite([0.2; 3], [1.0; 3], 1.0), [1.0; 3]);
        assert_eq!(composite([0.2; 3], [1.0; 3], 0.0), [0.2; 3]);
        let half = composite([0.0; 3], [1.0, 0.5, 0.0], 0.5);
        assert_relative_eq!(half[0], 0.5);
        assert_relative_eq!(half[1], 0.25);
    }
}
