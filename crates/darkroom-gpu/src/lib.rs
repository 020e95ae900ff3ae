//! Render backends for the darkroom adjustment pipeline.
//!
//! A backend owns every resource needed to draw one source image: the
//! program, the quad vertex buffer, the uniform buffer, the source texture,
//! the four LUT textures and the render target. The editor session talks to
//! it only through the narrow [`RenderBackend`] methods.
//!
//! # Architecture
//!
//! ```text
//! EditorSession
//!     └── Box<dyn RenderBackend>
//!             ├── CpuBackend  (darkroom-ops reference renderer, rayon)
//!             └── WgpuBackend (WGSL vertex + fragment program)
//! ```
//!
//! # Example
//!
//! ```rust
//! use darkroom_core::{Bitmap, Channel};
//! use darkroom_gpu::{create_backend, Backend};
//! use darkroom_lut::ToneLut;
//! use darkroom_ops::{AdjustmentState, FrameUniforms};
//!
//! let src = Bitmap::filled(4, 4, [10, 20, 30, 255])?;
//! let mut backend = create_backend(Backend::Cpu, &src)?;
//! backend.upload_lut(Channel::Combined, &ToneLut::default())?;
//! backend.set_uniforms(&FrameUniforms::new(&AdjustmentState::default(), None))?;
//! backend.render()?;
//! assert_eq!(backend.read_back()?, src);
//! backend.release();
//! # Ok::<(), darkroom_gpu::GpuError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `wgpu` - GPU backend via wgpu (Vulkan/Metal/DX12)

#![warn(missing_docs)]

pub mod backend;
#[cfg(feature = "wgpu")]
pub mod context;
pub mod shaders;
pub mod uniforms;

pub use backend::{create_backend, Backend, BackendStats, CpuBackend, RenderBackend, BACKEND_ENV};
#[cfg(feature = "wgpu")]
pub use backend::WgpuBackend;
#[cfg(feature = "wgpu")]
pub use context::GpuContext;
pub use uniforms::{ParamsUniform, Vertex, QUAD};

use thiserror::Error;

/// GPU operation errors
#[derive(Error, Debug)]
pub enum GpuError {
    /// No adapter could be found.
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    /// Backend compiled out or otherwise unavailable.
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    /// Device request failed.
    #[error("Failed to create device: {0}")]
    DeviceCreation(String),

    /// Shader module or pipeline failed validation.
    #[error("Failed to compile shader: {0}")]
    ShaderCompilation(String),

    /// Image exceeds the device texture limit.
    #[error("Image too large: {width}x{height} exceeds GPU limit {limit}")]
    ImageTooLarge {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
        /// Largest supported texture side
        limit: u32,
    },

    /// Zero or inconsistent dimensions.
    #[error("Invalid dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    /// Submission, mapping or read-back failure.
    #[error("GPU operation failed: {0}")]
    OperationFailed(String),

    /// Backend resources were already released.
    #[error("backend resources already released")]
    Released,

    /// Bitmap error.
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),

    /// CPU renderer error.
    #[error(transparent)]
    Ops(#[from] darkroom_ops::OpsError),
}

/// Result type for backend operations.
pub type GpuResult<T> = Result<T, GpuError>;
