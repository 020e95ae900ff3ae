//! Adjustment parameters.
//!
//! [`AdjustmentState`] is the flat record of slider values read by every
//! frame. Each field has a declared [`ParamRange`]; values outside it are
//! clamped and non-finite values fall back to the neutral default, so a
//! render never sees an out-of-range parameter.
//!
//! # Example
//!
//! ```rust
//! use darkroom_ops::{AdjustmentState, Param};
//!
//! let mut state = AdjustmentState::default();
//! state.set(Param::Contrast, 5.0);
//! assert_eq!(state.get(Param::Contrast), 2.0);
//!
//! let p: Param = "color-noise-reduction".parse().unwrap();
//! assert_eq!(p, Param::ColorNoiseReduction);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::OpsError;

/// Declared range and neutral value of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Smallest accepted value.
    pub min: f32,
    /// Largest accepted value.
    pub max: f32,
    /// Neutral value (no visible effect).
    pub default: f32,
}

impl ParamRange {
    const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Clamps `v` into range; NaN and infinities become the default.
    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        if v.is_finite() { v.clamp(self.min, self.max) } else { self.default }
    }
}

macro_rules! params {
    ($( $variant:ident => $field:ident, $name:literal, ($min:expr, $max:expr, $default:expr); )*) => {
        /// Names every adjustment parameter.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Param {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl Param {
            /// All parameters in declaration order.
            pub const ALL: &'static [Param] = &[$(Param::$variant),*];

            /// Canonical snake_case name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Param::$variant => $name,)*
                }
            }

            /// Declared range and neutral value.
            pub const fn range(self) -> ParamRange {
                match self {
                    $(Param::$variant => ParamRange::new($min, $max, $default),)*
                }
            }
        }

        /// Slider values for one frame.
        ///
        /// Missing fields deserialize to their neutral value, so a YAML
        /// preset only needs to list what it changes.
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct AdjustmentState {
            $(
                #[doc = concat!("`", $name, "`, range ", stringify!($min), "..=", stringify!($max))]
                pub $field: f32,
            )*
        }

        impl Default for AdjustmentState {
            fn default() -> Self {
                Self {
                    $($field: $default,)*
                }
            }
        }

        impl AdjustmentState {
            /// Current value of a parameter.
            pub fn get(&self, param: Param) -> f32 {
                match param {
                    $(Param::$variant => self.$field,)*
                }
            }

            fn slot(&mut self, param: Param) -> &mut f32 {
                match param {
                    $(Param::$variant => &mut self.$field,)*
                }
            }
        }
    };
}

params! {
    Exposure => exposure, "exposure", (-1.0, 1.0, 0.0);
    Contrast => contrast, "contrast", (0.0, 2.0, 1.0);
    Highlights => highlights, "highlights", (-1.0, 1.0, 0.0);
    Shadows => shadows, "shadows", (-1.0, 1.0, 0.0);
    Whites => whites, "whites", (-1.0, 1.0, 0.0);
    Blacks => blacks, "blacks", (-1.0, 1.0, 0.0);
    Gamma => gamma, "gamma", (0.1, 3.0, 1.0);
    Warmth => warmth, "warmth", (-1.0, 1.0, 0.0);
    Tint => tint, "tint", (-1.0, 1.0, 0.0);
    Hue => hue, "hue", (-180.0, 180.0, 0.0);
    Saturation => saturation, "saturation", (0.0, 2.0, 1.0);
    Luminance => luminance, "luminance", (0.0, 2.0, 1.0);
    Sharpening => sharpening, "sharpening", (0.0, 1.0, 0.0);
    NoiseReduction => noise_reduction, "noise_reduction", (0.0, 1.0, 0.0);
    ColorNoiseReduction => color_noise_reduction, "color_noise_reduction", (0.0, 1.0, 0.0);
    Vignette => vignette, "vignette", (0.0, 1.0, 0.0);
    Dehaze => dehaze, "dehaze", (0.0, 1.0, 0.0);
    Grain => grain, "grain", (0.0, 1.0, 0.0);
}

impl AdjustmentState {
    /// Sets a parameter, clamping into its range.
    ///
    /// Returns the value actually stored.
    pub fn set(&mut self, param: Param, value: f32) -> f32 {
        let range = param.range();
        let stored = range.clamp(value);
        if !value.is_finite() {
            warn!(param = param.name(), value, "non-finite parameter, using neutral value");
        }
        *self.slot(param) = stored;
        stored
    }

    /// Copy with every field forced into range.
    ///
    /// Fields written directly (or deserialized) skip [`AdjustmentState::set`];
    /// renderers always go through this.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for &param in Param::ALL {
            *out.slot(param) = param.range().clamp(self.get(param));
        }
        out
    }

    /// True if every parameter sits at its neutral value.
    pub fn is_neutral(&self) -> bool {
        Param::ALL.iter().all(|&p| self.get(p) == p.range().default)
    }

    /// Resets one parameter to neutral.
    pub fn reset(&mut self, param: Param) {
        *self.slot(param) = param.range().default;
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Param {
    type Err = OpsError;

    /// Accepts snake_case, kebab-case, any letter case, and `brightness`
    /// as an alias for exposure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        if key == "brightness" {
            return Ok(Param::Exposure);
        }
        Param::ALL
            .iter()
            .copied()
            .find(|p| p.name() == key)
            .ok_or_else(|| OpsError::UnknownParam(s.to_string()))
    }
}

/// Parses a `name=value` assignment.
///
/// # Example
///
/// ```rust
/// use darkroom_ops::{parse_assignment, Param};
///
/// assert_eq!(parse_assignment("gamma=2.2").unwrap(), (Param::Gamma, 2.2));
/// ```
pub fn parse_assignment(s: &str) -> Result<(Param, f32), OpsError> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| OpsError::InvalidParameter(format!("expected name=value, got '{s}'")))?;
    let param = name.parse()?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| OpsError::InvalidParameter(format!("{name}: {e}")))?;
    Ok((param, value))
}
