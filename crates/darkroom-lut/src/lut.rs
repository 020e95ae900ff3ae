//! Sampled tone LUTs.
//!
//! A [`ToneLut`] is the baked form of a [`Curve`](crate::Curve): a table of
//! output values at evenly spaced inputs over `[0, 1]`. Lookups interpolate
//! linearly between neighbouring entries; the GPU shader repeats the same
//! arithmetic so both renderers agree.

use darkroom_core::{clamp01, Channel, NUM_CHANNELS};

use crate::generate::generate_lut;
use crate::{ControlPoint, LutError, LutResult, LUT_SIZE};

/// A single-channel lookup table with values in `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use darkroom_lut::ToneLut;
///
/// let lut = ToneLut::identity(256);
/// assert!((lut.sample(0.5) - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ToneLut {
    values: Vec<f32>,
}

impl ToneLut {
    /// Identity ramp with `resolution` entries (at least 2).
    pub fn identity(resolution: usize) -> Self {
        Self { values: generate_lut(&[], resolution) }
    }

    /// Bakes a point list.
    pub fn from_points(points: &[ControlPoint], resolution: usize) -> Self {
        Self { values: generate_lut(points, resolution) }
    }

    /// Wraps precomputed values.
    ///
    /// Values are clamped to `[0, 1]`. Fewer than two entries is an error,
    /// since interpolation needs both ends of the domain.
    pub fn from_values(values: Vec<f32>) -> LutResult<Self> {
        if values.len() < 2 {
            return Err(LutError::InvalidSize(format!(
                "need at least 2 entries, got {}",
                values.len()
            )));
        }
        Ok(Self { values: values.into_iter().map(clamp01).collect() })
    }

    /// Wraps generator output, which is already sized and clamped.
    pub(crate) fn from_values_unchecked(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Table entries.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of entries.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.values.len()
    }

    /// Looks up `value` with linear interpolation between entries.
    ///
    /// Inputs outside `[0, 1]` are clamped first.
    pub fn sample(&self, value: f32) -> f32 {
        let size = self.values.len();
        if size == 0 {
            return value;
        }
        let idx_f = clamp01(value) * (size - 1) as f32;
        let idx0 = (idx_f.floor() as usize).min(size - 1);
        let idx1 = (idx0 + 1).min(size - 1);
        let frac = idx_f - idx0 as f32;
        self.values[idx0] * (1.0 - frac) + self.values[idx1] * frac
    }

    /// True if every entry equals its input position.
    pub fn is_identity(&self) -> bool {
        let scale = (self.values.len().max(2) - 1) as f32;
        self.values
            .iter()
            .enumerate()
            .all(|(i, v)| (v - i as f32 / scale).abs() < 1e-6)
    }
}

impl Default for ToneLut {
    fn default() -> Self {
        Self::identity(LUT_SIZE)
    }
}

/// The four channel LUTs, indexed by [`Channel`].
///
/// [`LutSet::apply`] runs the per-channel LUTs first and then the combined
/// LUT on each of the three results.
#[derive(Debug, Clone, PartialEq)]
pub struct LutSet {
    luts: [ToneLut; NUM_CHANNELS],
}

impl LutSet {
    /// All four channels set to the identity.
    pub fn identity(resolution: usize) -> Self {
        Self { luts: std::array::from_fn(|_| ToneLut::identity(resolution)) }
    }

    /// LUT for a channel.
    #[inline]
    pub fn get(&self, channel: Channel) -> &ToneLut {
        &self.luts[channel.index()]
    }

    /// Replaces the LUT for a channel.
    pub fn set(&mut self, channel: Channel, lut: ToneLut) {
        self.luts[channel.index()] = lut;
    }

    /// Iterates `(channel, lut)` pairs in channel order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &ToneLut)> {
        Channel::ALL.into_iter().zip(self.luts.iter())
    }

    /// Applies the curves to an RGB triple.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let combined = self.get(Channel::Combined);
        let r = combined.sample(self.get(Channel::Red).sample(rgb[0]));
        let g = combined.sample(self.get(Channel::Green).sample(rgb[1]));
        let b = combined.sample(self.get(Channel::Blue).sample(rgb[2]));
        [r, g, b]
    }

    /// True if all four channels are the identity.
    pub fn is_identity(&self) -> bool {
        self.luts.iter().all(ToneLut::is_identity)
    }
}

impl Default for LutSet {
    fn default() -> Self {
        Self::identity(LUT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_interpolates() {
        let lut = ToneLut::from_values(vec![0.0, 1.0, 0.0]).unwrap();
        assert_relative_eq!(lut.sample(0.25), 0.5, epsilon = 1e-6);
        assert_relative_eq!(lut.sample(0.5), 1.0, epsilon = 1e-6);
        assert_relative_eq!(lut.sample(1.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sample_clamps_input() {
        let lut = ToneLut::identity(256);
        assert_eq!(lut.sample(-3.0), 0.0);
        assert_eq!(lut.sample(7.0), 1.0);
        assert_eq!(lut.sample(f32::NAN), 0.0);
    }

    #[test]
    fn test_from_values_rejects_short_tables() {
        assert!(ToneLut::from_values(vec![0.5]).is_err());
        let lut = ToneLut::from_values(vec![-1.0, 2.0]).unwrap();
        assert_eq!(lut.values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_set_applies_channel_then_combined() {
        let mut set = LutSet::default();
        // Red curve inverts, combined curve halves.
        set.set(Channel::Red, ToneLut::from_values(vec![1.0, 0.0]).unwrap());
        set.set(Channel::Combined, ToneLut::from_values(vec![0.0, 0.5]).unwrap());
        let [r, g, b] = set.apply([0.0, 1.0, 0.5]);
        assert_relative_eq!(r, 0.5, epsilon = 1e-6);
        assert_relative_eq!(g, 0.5, epsilon = 1e-6);
        assert_relative_eq!(b, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_default_set_is_identity() {
        let set = LutSet::default();
        assert!(set.is_identity());
        assert_eq!(set.iter().count(), 4);
    }
}
