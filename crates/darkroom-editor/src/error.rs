//! Editor error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors surfaced by the editor session.
///
/// Backend creation failures are fatal to the session; per-frame numeric
/// problems never show up here because parameters are clamped.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Bitmap error.
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),

    /// Curve or LUT error.
    #[error(transparent)]
    Lut(#[from] darkroom_lut::LutError),

    /// Parameter error.
    #[error(transparent)]
    Ops(#[from] darkroom_ops::OpsError),

    /// Backend initialization or rendering failure.
    #[error(transparent)]
    Gpu(#[from] darkroom_gpu::GpuError),

    /// Read-back requested while the last render predates the current state.
    #[error("frame is stale: rendered generation {rendered:?}, current {current}")]
    StaleFrame {
        /// Generation of the last completed render, if any.
        rendered: Option<u64>,
        /// Current state generation.
        current: u64,
    },

    /// Session resources were already released.
    #[error("editor session is closed")]
    Closed,

    /// Config or preset could not be parsed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config or preset file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}
