//! Error types for darkroom-core.
//!
//! Only bitmap construction and addressing can fail at this level. Everything
//! numeric downstream (out-of-range parameters, degenerate curves) is absorbed
//! by clamping rather than reported.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or addressing a [`crate::Bitmap`].
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height is zero, or the pixel count overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Pixel buffer length doesn't match `width * height * 4`.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        actual: usize,
    },

    /// Pixel coordinates are outside the bitmap.
    #[error("pixel ({x}, {y}) out of bounds for bitmap {width}x{height}")]
    OutOfBounds {
        /// X coordinate
        x: u32,
        /// Y coordinate
        y: u32,
        /// Bitmap width
        width: u32,
        /// Bitmap height
        height: u32,
    },

    /// Channel name couldn't be parsed.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::OutOfBounds { x: 100, y: 50, width: 80, height: 60 };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("80x60"));

        let err = Error::BufferSizeMismatch { expected: 16, actual: 12 };
        assert!(err.to_string().contains("expected 16"));
    }
}
