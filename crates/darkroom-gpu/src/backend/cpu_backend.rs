//! CPU backend: the reference renderer behind the backend trait.

use darkroom_core::{Bitmap, Channel};
use darkroom_lut::{LutSet, ToneLut};
use darkroom_ops::{render_frame, FrameUniforms};
#[allow(unused_imports)]
use tracing::{debug, trace};

use super::{validate_source, BackendStats, RenderBackend};
use crate::{GpuError, GpuResult};

struct Resources {
    source: Bitmap,
    luts: LutSet,
    frame: FrameUniforms,
    output: Option<Bitmap>,
}

/// Renders with `darkroom_ops::render_frame` (rayon row parallelism).
pub struct CpuBackend {
    dims: (u32, u32),
    resources: Option<Resources>,
    stats: BackendStats,
}

impl CpuBackend {
    /// Takes a private copy of `source`; the caller's bitmap is never
    /// touched again.
    pub fn new(source: &Bitmap) -> GpuResult<Self> {
        validate_source(source)?;
        debug!(width = source.width(), height = source.height(), "cpu backend: allocate");
        Ok(Self {
            dims: source.dimensions(),
            resources: Some(Resources {
                source: source.clone(),
                luts: LutSet::default(),
                frame: FrameUniforms::default(),
                output: None,
            }),
            stats: BackendStats { allocations: 1, ..Default::default() },
        })
    }

    fn live(&mut self) -> GpuResult<&mut Resources> {
        self.resources.as_mut().ok_or(GpuError::Released)
    }
}

impl RenderBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dims
    }

    fn upload_lut(&mut self, channel: Channel, lut: &ToneLut) -> GpuResult<()> {
        self.live()?.luts.set(channel, lut.clone());
        self.stats.lut_uploads += 1;
        trace!(channel = %channel, "cpu backend: lut upload");
        Ok(())
    }

    fn set_uniforms(&mut self, frame: &FrameUniforms) -> GpuResult<()> {
        self.live()?.frame = *frame;
        self.stats.uniform_uploads += 1;
        Ok(())
    }

    fn render(&mut self) -> GpuResult<()> {
        let res = self.live()?;
        res.output = Some(render_frame(&res.source, &res.luts, &res.frame)?);
        self.stats.draws += 1;
        Ok(())
    }

    fn read_back(&mut self) -> GpuResult<Bitmap> {
        self.live()?
            .output
            .clone()
            .ok_or_else(|| GpuError::OperationFailed("read_back before any render".into()))
    }

    fn release(&mut self) {
        if self.resources.take().is_some() {
            self.stats.releases += 1;
            debug!("cpu backend: released");
        }
    }

    fn is_released(&self) -> bool {
        self.resources.is_none()
    }

    fn stats(&self) -> BackendStats {
        self.stats
    }
}

impl Drop for CpuBackend {
    fn drop(&mut self) {
        self.release();
    }
}
