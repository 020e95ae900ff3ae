//! On-screen curve geometry.
//!
//! The editor draws a smooth Catmull-Rom curve through the sorted and
//! extended control points. This is feedback only: pixels are always mapped
//! through the piecewise-linear [`ToneLut`](crate::ToneLut), so nothing here
//! feeds back into rendering.

use darkroom_core::clamp01;

use crate::generate::extend_points;
use crate::{ControlPoint, Curve};

/// Samples a smooth curve through `points` at `samples` evenly spaced x
/// positions over `[0, 1]`.
///
/// Fewer than two extended points degrade to the identity diagonal. Output
/// y values are clamped to `[0, 1]`, so overshoot between steep points is
/// cut off rather than drawn outside the canvas.
///
/// # Example
///
/// ```rust
/// use darkroom_lut::{display_path, ControlPoint};
///
/// let path = display_path(&[ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)], 5);
/// assert_eq!(path.len(), 5);
/// assert!((path[2].y - 0.5).abs() < 1e-6);
/// ```
pub fn display_path(points: &[ControlPoint], samples: usize) -> Vec<ControlPoint> {
    let samples = samples.max(2);
    let ext = extend_points(points);
    let scale = (samples - 1) as f32;

    (0..samples)
        .map(|i| {
            let x = i as f32 / scale;
            ControlPoint::new(x, evaluate_smooth(&ext, x))
        })
        .collect()
}

/// Catmull-Rom evaluation over a sorted point list, mirroring virtual
/// endpoints at the boundaries.
fn evaluate_smooth(pts: &[ControlPoint], x: f32) -> f32 {
    if pts.len() < 2 {
        return x;
    }
    let last = pts.len() - 1;
    if x <= pts[0].x {
        return pts[0].y;
    }
    if x >= pts[last].x {
        return pts[last].y;
    }

    // Binary search for the enclosing segment.
    let (mut lo, mut hi) = (0, last);
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if pts[mid].x <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let p1 = pts[lo];
    let p2 = pts[hi];
    let p0 = if lo > 0 { pts[lo - 1].y } else { 2.0 * p1.y - p2.y };
    let p3 = if hi < last { pts[hi + 1].y } else { 2.0 * p2.y - p1.y };

    let span = p2.x - p1.x;
    let t = if span.abs() < 1e-10 { 0.5 } else { (x - p1.x) / span };
    clamp01(catmull_rom(p0, p1.y, p2.y, p3, t))
}

/// Catmull-Rom cubic between `p1` and `p2`.
fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// A line segment in canvas pixels.
pub type Segment = [(f32, f32); 2];

/// Everything needed to draw one channel's curve on a canvas.
///
/// Coordinates are canvas pixels with the origin at the top left, so an
/// output of 1.0 sits at `y = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveOverlay {
    /// Grid lines (verticals first, then horizontals).
    pub grid: Vec<Segment>,
    /// Smooth curve polyline.
    pub path: Vec<(f32, f32)>,
    /// Handle centres in the curve's insertion order.
    pub handles: Vec<(f32, f32)>,
}

impl CurveOverlay {
    /// Lays out grid, curve and handles for a `width` x `height` canvas.
    ///
    /// `divisions` is the number of grid cells per axis (4 gives quarter
    /// lines); `samples` is the polyline resolution.
    pub fn build(curve: &Curve, width: f32, height: f32, divisions: u32, samples: usize) -> Self {
        let to_canvas = |p: ControlPoint| (p.x * width, (1.0 - p.y) * height);

        let divisions = divisions.max(1);
        let mut grid = Vec::with_capacity(2 * (divisions as usize + 1));
        for i in 0..=divisions {
            let x = width * i as f32 / divisions as f32;
            grid.push([(x, 0.0), (x, height)]);
        }
        for i in 0..=divisions {
            let y = height * i as f32 / divisions as f32;
            grid.push([(0.0, y), (width, y)]);
        }

        Self {
            grid,
            path: display_path(curve.points(), samples).into_iter().map(to_canvas).collect(),
            handles: curve.points().iter().copied().map(to_canvas).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_catmull_rom_endpoints() {
        assert_relative_eq!(catmull_rom(0.0, 0.25, 0.75, 1.0, 0.0), 0.25, epsilon = 1e-6);
        assert_relative_eq!(catmull_rom(0.0, 0.25, 0.75, 1.0, 1.0), 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_path_passes_through_points() {
        let pts = [ControlPoint::new(0.0, 0.1), ControlPoint::new(0.5, 0.9), ControlPoint::new(1.0, 0.2)];
        let path = display_path(&pts, 3);
        assert_relative_eq!(path[0].y, 0.1);
        assert_relative_eq!(path[1].y, 0.9);
        assert_relative_eq!(path[2].y, 0.2);
    }

    #[test]
    fn test_path_clamped() {
        let pts = [
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(0.45, 1.0),
            ControlPoint::new(0.55, 0.0),
            ControlPoint::new(1.0, 1.0),
        ];
        assert!(display_path(&pts, 200).iter().all(|p| (0.0..=1.0).contains(&p.y)));
    }

    #[test]
    fn test_path_does_not_touch_lut() {
        // The smooth path bows away from the straight segment while the LUT
        // stays piecewise linear.
        let curve = Curve::new(vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(0.5, 0.8),
            ControlPoint::new(1.0, 1.0),
        ]);
        let lut = curve.to_lut(5);
        assert_relative_eq!(lut.values()[1], 0.4, epsilon = 1e-6);
        let smooth = display_path(curve.points(), 5);
        assert!((smooth[1].y - 0.4).abs() > 1e-3);
    }

    #[test]
    fn test_overlay_flips_y() {
        let overlay = CurveOverlay::build(&Curve::default(), 200.0, 100.0, 4, 16);
        assert_eq!(overlay.grid.len(), 10);
        assert_eq!(overlay.handles, vec![(0.0, 100.0), (200.0, 0.0)]);
        assert_eq!(overlay.path.len(), 16);
    }
}
