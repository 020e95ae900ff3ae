//! Error types for adjustment operations.

use thiserror::Error;

/// Error type for adjustment operations.
///
/// Numeric parameter problems never surface here; values are clamped
/// instead. These errors cover lookups by name and bitmap construction.
#[derive(Error, Debug)]
pub enum OpsError {
    /// No adjustment parameter has this name.
    #[error("unknown parameter: {0}")]
    UnknownParam(String),

    /// A parameter assignment could not be parsed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Bitmap error from the core crate.
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),
}

/// Result type for adjustment operations.
pub type OpsResult<T> = Result<T, OpsError>;
