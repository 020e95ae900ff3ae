//! Tone curve value types.
//!
//! [`Curve`] keeps its points in insertion order so an index handed out by
//! [`Curve::add_point`] or a hit test stays valid for the whole drag, even
//! when the point is dragged past a neighbour. The sorted, boundary-extended
//! view is derived on demand.

use darkroom_core::Channel;
use serde::{Deserialize, Serialize};

use crate::generate::{extend_points, generate_lut, sort_points};
use crate::{ControlPoint, LutError, LutResult, LutSet, ToneLut};

/// Control points for one channel.
///
/// Mutation methods are pure: they return a new curve and leave `self`
/// untouched.
///
/// # Example
///
/// ```rust
/// use darkroom_lut::{ControlPoint, Curve};
///
/// let curve = Curve::default();
/// let (curve, idx) = curve.add_point(ControlPoint::new(0.5, 0.7));
/// let curve = curve.move_point(idx, ControlPoint::new(0.4, 0.8)).unwrap();
/// assert_eq!(curve.points()[idx], ControlPoint::new(0.4, 0.8));
/// let curve = curve.remove_point(idx).unwrap();
/// assert_eq!(curve, Curve::default());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    points: Vec<ControlPoint>,
}

impl Curve {
    /// Creates a curve from points (clamped into range).
    pub fn new(points: Vec<ControlPoint>) -> Self {
        Self {
            points: points.into_iter().map(ControlPoint::clamped).collect(),
        }
    }

    /// A curve with no points; its LUT is the identity.
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Points in insertion order.
    #[inline]
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Number of stored points (synthetic boundaries excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the curve holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends a point, returning the new curve and the point's index.
    pub fn add_point(&self, point: ControlPoint) -> (Self, usize) {
        let mut points = self.points.clone();
        points.push(point.clamped());
        let index = points.len() - 1;
        (Self { points }, index)
    }

    /// Moves the point at `index`, clamping the new position to `[0, 1]`.
    pub fn move_point(&self, index: usize, to: ControlPoint) -> LutResult<Self> {
        self.check_index(index)?;
        let mut points = self.points.clone();
        points[index] = to.clamped();
        Ok(Self { points })
    }

    /// Removes the point at `index`.
    pub fn remove_point(&self, index: usize) -> LutResult<Self> {
        self.check_index(index)?;
        let mut points = self.points.clone();
        points.remove(index);
        Ok(Self { points })
    }

    fn check_index(&self, index: usize) -> LutResult<()> {
        if index >= self.points.len() {
            return Err(LutError::PointIndex { index, len: self.points.len() });
        }
        Ok(())
    }

    /// Points sorted by x (stable).
    pub fn sorted(&self) -> Vec<ControlPoint> {
        sort_points(&self.points)
    }

    /// Sorted points plus the synthetic x = 0 / x = 1 boundaries.
    pub fn extended(&self) -> Vec<ControlPoint> {
        extend_points(&self.points)
    }

    /// True if every point lies on y = x (or there are none).
    pub fn is_identity(&self) -> bool {
        let ext = self.extended();
        ext.is_empty()
            || (ext.first().is_some_and(|p| p.y == 0.0)
                && ext.last().is_some_and(|p| p.y == 1.0)
                && ext.iter().all(|p| (p.x - p.y).abs() < 1e-6))
    }

    /// Bakes the curve into a LUT.
    pub fn to_lut(&self, resolution: usize) -> ToneLut {
        ToneLut::from_values_unchecked(generate_lut(&self.points, resolution))
    }
}

impl Default for Curve {
    /// Identity-like curve spanning the full range: (0, 0) and (1, 1).
    fn default() -> Self {
        Self::new(vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)])
    }
}

/// One curve per channel.
///
/// All four curves always exist; "resetting" a channel means replacing its
/// curve with [`Curve::default`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSet {
    /// Combined (RGB) curve.
    pub combined: Curve,
    /// Red curve.
    pub red: Curve,
    /// Green curve.
    pub green: Curve,
    /// Blue curve.
    pub blue: Curve,
}

impl CurveSet {
    /// Curve for a channel.
    pub fn get(&self, channel: Channel) -> &Curve {
        match channel {
            Channel::Combined => &self.combined,
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// Replaces the curve for a channel.
    pub fn set(&mut self, channel: Channel, curve: Curve) {
        match channel {
            Channel::Combined => self.combined = curve,
            Channel::Red => self.red = curve,
            Channel::Green => self.green = curve,
            Channel::Blue => self.blue = curve,
        }
    }

    /// Bakes every channel.
    pub fn to_luts(&self, resolution: usize) -> LutSet {
        let mut luts = LutSet::identity(resolution);
        for ch in Channel::ALL {
            luts.set(ch, self.get(ch).to_lut(resolution));
        }
        luts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let c = Curve::default();
        assert_eq!(c.len(), 2);
        assert!(c.is_identity());
        assert!(Curve::empty().is_identity());
    }

    #[test]
    fn test_indices_stable_across_reordering_moves() {
        let (c, idx) = Curve::default().add_point(ControlPoint::new(0.2, 0.2));
        // Drag the new point past the (1, 1) endpoint in x.
        let c = c.move_point(idx, ControlPoint::new(1.5, 0.4)).unwrap();
        assert_eq!(c.points()[idx], ControlPoint::new(1.0, 0.4));
        // The sorted view follows x, stable for the shared x = 1.
        let sorted = c.sorted();
        assert_eq!(sorted[1], ControlPoint::new(1.0, 1.0));
        assert_eq!(sorted[2], ControlPoint::new(1.0, 0.4));
    }

    #[test]
    fn test_bad_index() {
        let c = Curve::default();
        assert!(matches!(c.move_point(5, ControlPoint::default()), Err(LutError::PointIndex { index: 5, len: 2 })));
        assert!(c.remove_point(2).is_err());
    }

    #[test]
    fn test_remove_all_gives_identity_lut() {
        let c = Curve::new(vec![ControlPoint::new(0.0, 1.0), ControlPoint::new(1.0, 0.0)]);
        let c = c.remove_point(1).unwrap().remove_point(0).unwrap();
        assert!(c.is_empty());
        assert!(c.to_lut(256).is_identity());
    }

    #[test]
    fn test_curve_set_yaml() {
        let yaml = "combined:\n  - {x: 0.0, y: 1.0}\n  - {x: 1.0, y: 0.0}\n";
        let set: CurveSet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(set.combined.len(), 2);
        assert_eq!(set.red, Curve::default());
        let luts = set.to_luts(256);
        assert_eq!(luts.get(Channel::Combined).values()[0], 1.0);
        assert!(luts.get(Channel::Blue).is_identity());
    }
}
