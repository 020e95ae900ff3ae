//! # darkroom-lut
//!
//! Tone curves and the curve-to-LUT generator.
//!
//! A [`Curve`] is an editable set of [`ControlPoint`]s for one
//! [`Channel`](darkroom_core::Channel). [`generate_lut`] turns its points into
//! a 256-entry piecewise-linear lookup table ([`ToneLut`]) that the renderers
//! sample per pixel.
//!
//! # Usage
//!
//! ```rust
//! use darkroom_lut::{ControlPoint, Curve, ToneLut, LUT_SIZE};
//!
//! // Inverted identity
//! let curve = Curve::new(vec![ControlPoint::new(0.0, 1.0), ControlPoint::new(1.0, 0.0)]);
//! let lut = curve.to_lut(LUT_SIZE);
//! assert_eq!(lut.values()[0], 1.0);
//! assert_eq!(lut.values()[255], 0.0);
//!
//! // No points at all: identity
//! let lut = ToneLut::from_points(&[], LUT_SIZE);
//! assert!(lut.is_identity());
//! ```
//!
//! # Modules
//!
//! - [`point`] - control points
//! - [`curve`] - per-channel curve value type and the four-channel set
//! - [`generate`] - the LUT generator
//! - [`lut`] - sampled LUTs
//! - [`display`] - smooth curve geometry for on-screen feedback only

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod curve;
pub mod display;
mod error;
pub mod generate;
pub mod lut;
pub mod point;

pub use curve::{Curve, CurveSet};
pub use display::{display_path, CurveOverlay};
pub use error::{LutError, LutResult};
pub use generate::{extend_points, generate_lut, sort_points};
pub use lut::{LutSet, ToneLut};
pub use point::ControlPoint;

/// Default LUT resolution (one entry per 8-bit input level).
pub const LUT_SIZE: usize = 256;
