//! # darkroom-core
//!
//! Core types shared by every darkroom crate.
//!
//! - [`Bitmap`] - decoded, dimensioned RGBA8 image (the session's only input
//!   and the export path's output)
//! - [`Channel`] - curve channel tag (combined, red, green, blue)
//! - [`Error`] / [`Result`] - core error type
//!
//! ## Crate Structure
//!
//! ```text
//! darkroom-core (this crate)
//!    ^
//!    |
//!    +-- darkroom-lut    (curves, LUT generation)
//!    +-- darkroom-ops    (adjustment parameters, per-pixel stages)
//!    +-- darkroom-gpu    (render backends)
//!    +-- darkroom-editor (curve editor, brush, session)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bitmap;
pub mod channel;
pub mod error;

pub use bitmap::Bitmap;
pub use channel::{Channel, NUM_CHANNELS};
pub use error::{Error, Result};

/// Clamps a value into the unit interval.
///
/// NaN maps to 0 so a single bad sample can never poison later stages.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitmap::Bitmap;
    pub use crate::channel::{Channel, NUM_CHANNELS};
    pub use crate::error::{Error, Result};
    pub use crate::clamp01;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(7.0), 1.0);
        assert_eq!(clamp01(f32::NAN), 0.0);
    }
}
