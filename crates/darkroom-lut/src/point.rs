//! Curve control points.

use darkroom_core::clamp01;
use serde::{Deserialize, Serialize};

/// A single control point on a tone curve.
///
/// Both coordinates live in `[0, 1]`; the constructor clamps, so every point
/// reachable through the public API is in range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Input value.
    pub x: f32,
    /// Output value.
    pub y: f32,
}

impl ControlPoint {
    /// Create a control point, clamping both coordinates to `[0, 1]`.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x: clamp01(x), y: clamp01(y) }
    }

    /// Same point with coordinates forced back into range.
    ///
    /// Points built by struct literal or deserialized from a preset bypass
    /// [`ControlPoint::new`]; this restores the invariant.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(self.x, self.y)
    }
}

impl From<(f32, f32)> for ControlPoint {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f32; 2]> for ControlPoint {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        let p = ControlPoint::new(-0.2, 1.7);
        assert_eq!(p, ControlPoint { x: 0.0, y: 1.0 });
    }

    #[test]
    fn test_clamped_fixes_literals() {
        let p = ControlPoint { x: 2.0, y: f32::NAN }.clamped();
        assert_eq!(p, ControlPoint { x: 1.0, y: 0.0 });
    }
}
