//! LUT and curve error types.

use thiserror::Error;

/// Result type for curve and LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors raised by curve editing and LUT construction.
///
/// LUT *generation* never fails; degenerate point sets are resolved by the
/// generator's fallback rules instead.
#[derive(Debug, Error)]
pub enum LutError {
    /// Invalid LUT size.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// Control point index doesn't exist on the curve.
    #[error("control point {index} out of range (curve has {len} points)")]
    PointIndex {
        /// Requested index
        index: usize,
        /// Number of points on the curve
        len: usize,
    },
}
