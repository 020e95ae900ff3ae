//! Curve-to-LUT generation.
//!
//! # Algorithm
//!
//! 1. **Empty input**: return the identity ramp `i / (resolution - 1)`.
//! 2. **Sort**: stable sort by x, so points sharing an x keep their
//!    original relative order.
//! 3. **Extend**: prepend `(0, first.y)` unless a point already sits at
//!    x = 0, append `(1, last.y)` unless one sits at x = 1.
//! 4. **Sample**: for each `x = i / (resolution - 1)` scan the extended
//!    list for the first pair with `p1.x <= x <= p2.x` and interpolate
//!    linearly, clamping to `[0, 1]`.
//!
//! Each entry is computed from the points alone (no running sums), so the
//! same point set always yields a bit-identical table.
//!
//! # Duplicate x
//!
//! The first matching pair wins. With two points at the same x the table
//! takes the earlier point's y exactly at that x and the later point's y
//! just right of it, a vertical step.

use darkroom_core::clamp01;

use crate::ControlPoint;

/// Stable sort by x ascending.
pub fn sort_points(points: &[ControlPoint]) -> Vec<ControlPoint> {
    let mut sorted: Vec<ControlPoint> = points.iter().map(|p| p.clamped()).collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
    sorted
}

/// Sorted point list extended with synthetic boundary points at x = 0 and x = 1.
///
/// An empty input stays empty.
///
/// # Example
///
/// ```rust
/// use darkroom_lut::{extend_points, ControlPoint};
///
/// let ext = extend_points(&[ControlPoint::new(0.5, 0.3)]);
/// assert_eq!(ext, vec![
///     ControlPoint::new(0.0, 0.3),
///     ControlPoint::new(0.5, 0.3),
///     ControlPoint::new(1.0, 0.3),
/// ]);
/// ```
pub fn extend_points(points: &[ControlPoint]) -> Vec<ControlPoint> {
    let sorted = sort_points(points);
    let (Some(first), Some(last)) = (sorted.first().copied(), sorted.last().copied()) else {
        return sorted;
    };

    let mut ext = Vec::with_capacity(sorted.len() + 2);
    if first.x > 0.0 {
        ext.push(ControlPoint::new(0.0, first.y));
    }
    ext.extend_from_slice(&sorted);
    if last.x < 1.0 {
        ext.push(ControlPoint::new(1.0, last.y));
    }
    ext
}

/// Generates a `resolution`-entry LUT from control points.
///
/// Never fails: an empty list gives the identity ramp and `resolution`
/// below 2 is raised to 2.
///
/// # Example
///
/// ```rust
/// use darkroom_lut::{generate_lut, ControlPoint};
///
/// let lut = generate_lut(&[ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)], 256);
/// assert_eq!(lut.len(), 256);
/// assert_eq!(lut[128], 128.0 / 255.0);
/// ```
pub fn generate_lut(points: &[ControlPoint], resolution: usize) -> Vec<f32> {
    let resolution = resolution.max(2);
    let scale = (resolution - 1) as f32;

    if points.is_empty() {
        return (0..resolution).map(|i| i as f32 / scale).collect();
    }

    let ext = extend_points(points);
    (0..resolution)
        .map(|i| evaluate_linear(&ext, i as f32 / scale))
        .collect()
}

/// Piecewise-linear evaluation over an extended point list.
fn evaluate_linear(ext: &[ControlPoint], x: f32) -> f32 {
    for pair in ext.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        if x < p1.x || x > p2.x {
            continue;
        }
        // Exact endpoints return the stored y so boundary entries match
        // their control points bit for bit.
        if x == p1.x {
            return p1.y;
        }
        if x == p2.x {
            return p2.y;
        }
        let span = p2.x - p1.x;
        let span = if span > 0.0 { span } else { f32::EPSILON };
        let t = (x - p1.x) / span;
        return clamp01(p1.y + t * (p2.y - p1.y));
    }
    // The extension covers [0, 1]; only a single-point list lands here.
    ext.last().map_or(x, |p| p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pts(raw: &[(f32, f32)]) -> Vec<ControlPoint> {
        raw.iter().map(|&(x, y)| ControlPoint::new(x, y)).collect()
    }

    #[test]
    fn test_identity_points() {
        let lut = generate_lut(&pts(&[(0.0, 0.0), (1.0, 1.0)]), 256);
        for (i, v) in lut.iter().enumerate() {
            assert_relative_eq!(*v, i as f32 / 255.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_empty_is_identity() {
        let lut = generate_lut(&[], 256);
        assert_eq!(lut.len(), 256);
        assert_eq!(lut[0], 0.0);
        assert_eq!(lut[255], 1.0);
        assert_eq!(lut[51], 51.0 / 255.0);
    }

    #[test]
    fn test_single_point_is_flat() {
        let lut = generate_lut(&pts(&[(0.4, 0.7)]), 256);
        assert!(lut.iter().all(|&v| v == 0.7));
    }

    #[test]
    fn test_boundaries_follow_nearest_points() {
        let lut = generate_lut(&pts(&[(0.25, 0.2), (0.75, 0.9)]), 256);
        assert_eq!(lut[0], 0.2);
        assert_eq!(lut[255], 0.9);
    }

    #[test]
    fn test_real_boundary_points_not_duplicated() {
        let ext = extend_points(&pts(&[(1.0, 0.5), (0.0, 0.1)]));
        assert_eq!(ext.len(), 2);
        assert_eq!(ext[0], ControlPoint::new(0.0, 0.1));
    }

    #[test]
    fn test_permutation_invariance() {
        let a = pts(&[(0.1, 0.3), (0.5, 0.2), (0.9, 0.8), (0.6, 0.6)]);
        let mut b = a.clone();
        b.reverse();
        let c = vec![a[2], a[0], a[3], a[1]];
        let la = generate_lut(&a, 256);
        assert_eq!(la, generate_lut(&b, 256));
        assert_eq!(la, generate_lut(&c, 256));
    }

    #[test]
    fn test_duplicate_x_first_wins() {
        // Same x, different y: exact x picks the earlier point.
        let lut = generate_lut(&pts(&[(0.0, 0.0), (0.5, 0.2), (0.5, 0.8), (1.0, 1.0)]), 3);
        assert_eq!(lut[1], 0.2);

        let lut = generate_lut(&pts(&[(0.0, 0.0), (0.5, 0.8), (0.5, 0.2), (1.0, 1.0)]), 3);
        assert_eq!(lut[1], 0.8);
    }

    #[test]
    fn test_output_clamped_and_deterministic() {
        let p = pts(&[(0.0, 0.0), (0.3, 1.0), (0.31, 0.0), (1.0, 1.0)]);
        let a = generate_lut(&p, 256);
        let b = generate_lut(&p, 256);
        assert_eq!(
            a.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            b.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
        assert!(a.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_tiny_resolution_coerced() {
        let lut = generate_lut(&[], 0);
        assert_eq!(lut, vec![0.0, 1.0]);
    }
}
