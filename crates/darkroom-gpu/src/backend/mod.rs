//! Render backends with automatic selection.
//!
//! Provides a CPU (rayon) and a wgpu backend behind one trait.
//! [`create_backend`] validates the source image before any resource is
//! allocated, so a bad bitmap never leaves half-built GPU state behind.

mod cpu_backend;

#[cfg(feature = "wgpu")]
mod wgpu_backend;

pub use cpu_backend::CpuBackend;

#[cfg(feature = "wgpu")]
pub use wgpu_backend::WgpuBackend;

use std::fmt;
use std::str::FromStr;

use darkroom_core::{Bitmap, Channel};
use darkroom_lut::ToneLut;
use darkroom_ops::FrameUniforms;
use tracing::{debug, warn};

use crate::{GpuError, GpuResult};

/// Environment variable that overrides the requested backend
/// (`auto`, `cpu` or `wgpu`).
pub const BACKEND_ENV: &str = "DARKROOM_BACKEND";

/// Available render backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Auto-select best available (wgpu > CPU).
    #[default]
    Auto,
    /// CPU reference renderer using rayon.
    Cpu,
    /// wgpu backend (Vulkan/Metal/DX12).
    Wgpu,
}

impl Backend {
    /// Check if this backend is available on current system.
    pub fn is_available(&self) -> bool {
        match self {
            Self::Auto => true,
            Self::Cpu => true,
            #[cfg(feature = "wgpu")]
            Self::Wgpu => crate::GpuContext::is_available(),
            #[cfg(not(feature = "wgpu"))]
            Self::Wgpu => false,
        }
    }

    /// Applies an override value such as the contents of [`BACKEND_ENV`].
    ///
    /// Unparsable values are ignored with a warning.
    pub fn with_override(self, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => self,
            Some(v) => match v.parse() {
                Ok(b) => b,
                Err(_) => {
                    warn!(value = v, "ignoring unknown {BACKEND_ENV}");
                    self
                }
            },
        }
    }

    /// Applies the [`BACKEND_ENV`] override from the process environment.
    pub fn resolve(self) -> Self {
        self.with_override(std::env::var(BACKEND_ENV).ok().as_deref())
    }

    /// Backend name as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Cpu => "cpu",
            Self::Wgpu => "wgpu",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = GpuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "wgpu" | "gpu" => Ok(Self::Wgpu),
            other => Err(GpuError::BackendNotAvailable(other.to_string())),
        }
    }
}

/// Work counters kept by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendStats {
    /// LUT texture uploads.
    pub lut_uploads: u64,
    /// Uniform buffer uploads.
    pub uniform_uploads: u64,
    /// Completed draws.
    pub draws: u64,
    /// Resource sets created.
    pub allocations: u64,
    /// Resource sets released.
    pub releases: u64,
}

impl BackendStats {
    /// Resource sets still alive.
    pub fn live_allocations(&self) -> u64 {
        self.allocations - self.releases
    }
}

/// One source image's render resources.
///
/// Implementations own the program, buffers and textures outright. After
/// [`release`](RenderBackend::release) every other method returns
/// [`GpuError::Released`].
pub trait RenderBackend: Send {
    /// Backend name.
    fn name(&self) -> &'static str;

    /// Source (and output) size.
    fn dimensions(&self) -> (u32, u32);

    /// Replaces one channel's LUT texture.
    fn upload_lut(&mut self, channel: Channel, lut: &ToneLut) -> GpuResult<()>;

    /// Replaces the frame uniforms.
    fn set_uniforms(&mut self, frame: &FrameUniforms) -> GpuResult<()>;

    /// Draws one frame and waits for it to complete.
    fn render(&mut self) -> GpuResult<()>;

    /// Copies the most recent frame back to host memory.
    fn read_back(&mut self) -> GpuResult<Bitmap>;

    /// Frees every resource. Calling it again is a no-op.
    fn release(&mut self);

    /// True once [`release`](RenderBackend::release) has run.
    fn is_released(&self) -> bool;

    /// Work counters.
    fn stats(&self) -> BackendStats;
}

/// Rejects bitmaps that cannot back a render target.
pub(crate) fn validate_source(source: &Bitmap) -> GpuResult<()> {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 || source.as_raw().len() != source.row_bytes() * h as usize {
        return Err(GpuError::InvalidDimensions(w, h));
    }
    Ok(())
}

/// Create a backend instance for `source`.
///
/// The requested backend passes through [`Backend::resolve`] first.
/// `Auto` picks wgpu when it is compiled in and an adapter exists, CPU
/// otherwise. Once wgpu is chosen, any initialization failure is returned
/// rather than papered over with the CPU path.
pub fn create_backend(backend: Backend, source: &Bitmap) -> GpuResult<Box<dyn RenderBackend>> {
    validate_source(source)?;
    let backend = backend.resolve();
    debug!(backend = %backend, width = source.width(), height = source.height(), "create_backend");

    match backend {
        Backend::Auto => {
            let best = if Backend::Wgpu.is_available() { Backend::Wgpu } else { Backend::Cpu };
            create_backend(best, source)
        }
        Backend::Cpu => Ok(Box::new(CpuBackend::new(source)?)),
        Backend::Wgpu => {
            #[cfg(feature = "wgpu")]
            {
                Ok(Box::new(WgpuBackend::new(source)?))
            }
            #[cfg(not(feature = "wgpu"))]
            {
                Err(GpuError::BackendNotAvailable("wgpu feature not enabled".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!("CPU".parse::<Backend>().unwrap(), Backend::Cpu);
        assert_eq!("gpu".parse::<Backend>().unwrap(), Backend::Wgpu);
        assert!("metal".parse::<Backend>().is_err());
        assert_eq!(Backend::Wgpu.to_string(), "wgpu");
    }

    #[test]
    fn test_override() {
        assert_eq!(Backend::Auto.with_override(Some("cpu")), Backend::Cpu);
        assert_eq!(Backend::Wgpu.with_override(None), Backend::Wgpu);
        assert_eq!(Backend::Cpu.with_override(Some("  ")), Backend::Cpu);
        assert_eq!(Backend::Cpu.with_override(Some("bogus")), Backend::Cpu);
    }

    #[test]
    fn test_cpu_always_available() {
        assert!(Backend::Cpu.is_available());
        assert!(Backend::Auto.is_available());
    }

    #[cfg(not(feature = "wgpu"))]
    #[test]
    fn test_wgpu_compiled_out() {
        let src = Bitmap::filled(2, 2, [0; 4]).unwrap();
        assert!(matches!(create_backend(Backend::Wgpu, &src), Err(GpuError::BackendNotAvailable(_))));
    }
}
