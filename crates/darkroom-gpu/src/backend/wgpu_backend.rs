//! wgpu backend implementation.
//!
//! Draws the full-screen quad with the [`ADJUST`](crate::shaders::ADJUST)
//! program into an RGBA8 render target, then copies the target into a
//! mappable staging buffer for read-back.

use std::sync::Arc;

use darkroom_core::{Bitmap, Channel, NUM_CHANNELS};
use darkroom_lut::{ToneLut, LUT_SIZE};
use darkroom_ops::FrameUniforms;
#[allow(unused_imports)]
use tracing::{debug, trace};
use wgpu::util::DeviceExt;

use super::{validate_source, BackendStats, RenderBackend};
use crate::uniforms::{ParamsUniform, Vertex, QUAD};
use crate::{shaders, GpuContext, GpuError, GpuResult};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

/// Binding slot of each channel's LUT texture, indexed by `Channel::index`.
const LUT_BINDINGS: [u32; NUM_CHANNELS] = [2, 3, 4, 5];

// =============================================================================
// Resources
// =============================================================================

/// Everything allocated for one source image.
struct Resources {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    source: wgpu::Texture,
    luts: [wgpu::Texture; NUM_CHANNELS],
    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    readback: wgpu::Buffer,
    padded_row: u32,
}

impl Resources {
    fn destroy(self) {
        self.vertex_buffer.destroy();
        self.uniform_buffer.destroy();
        self.readback.destroy();
        self.source.destroy();
        for lut in &self.luts {
            lut.destroy();
        }
        self.target.destroy();
    }
}

// =============================================================================
// WgpuBackend
// =============================================================================

/// GPU backend drawing with a WGSL vertex + fragment program.
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    dims: (u32, u32),
    resources: Option<Resources>,
    rendered: bool,
    stats: BackendStats,
}

impl WgpuBackend {
    /// Check if wgpu is available.
    pub fn is_available() -> bool {
        GpuContext::is_available()
    }

    /// Creates a device and uploads `source`.
    pub fn new(source: &Bitmap) -> GpuResult<Self> {
        Self::with_context(&GpuContext::new()?, source)
    }

    /// Uploads `source` on an existing context.
    ///
    /// Shader validation errors are captured with an error scope and
    /// returned as [`GpuError::ShaderCompilation`]; nothing is left
    /// allocated on failure.
    pub fn with_context(ctx: &GpuContext, source: &Bitmap) -> GpuResult<Self> {
        validate_source(source)?;
        let (width, height) = source.dimensions();
        let limit = ctx.max_texture_dimension();
        if width > limit || height > limit {
            return Err(GpuError::ImageTooLarge { width, height, limit });
        }

        let device = Arc::clone(&ctx.device);
        let queue = Arc::clone(&ctx.queue);
        debug!(width, height, adapter = ctx.adapter_name(), "wgpu backend: allocate");

        let (pipeline, layout) = create_pipeline(&device)?;
        let resources = create_resources(&device, &queue, pipeline, &layout, source);

        let mut backend = Self {
            device,
            queue,
            dims: (width, height),
            resources: Some(resources),
            rendered: false,
            stats: BackendStats { allocations: 1, ..Default::default() },
        };

        // Identity LUTs so a frame can render before any curve is edited.
        let identity = ToneLut::default();
        for ch in Channel::ALL {
            backend.write_lut(ch, &identity)?;
        }
        Ok(backend)
    }

    fn live(&self) -> GpuResult<&Resources> {
        self.resources.as_ref().ok_or(GpuError::Released)
    }

    fn write_lut(&self, channel: Channel, lut: &ToneLut) -> GpuResult<()> {
        let res = self.live()?;
        let texels = lut_texels(lut);
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &res.luts[channel.index()],
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&texels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * LUT_SIZE as u32),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d { width: LUT_SIZE as u32, height: 1, depth_or_array_layers: 1 },
        );
        Ok(())
    }
}

impl RenderBackend for WgpuBackend {
    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dims
    }

    fn upload_lut(&mut self, channel: Channel, lut: &ToneLut) -> GpuResult<()> {
        self.write_lut(channel, lut)?;
        self.stats.lut_uploads += 1;
        trace!(channel = %channel, "wgpu backend: lut upload");
        Ok(())
    }

    fn set_uniforms(&mut self, frame: &FrameUniforms) -> GpuResult<()> {
        let res = self.live()?;
        let (w, h) = self.dims;
        let packed = ParamsUniform::pack(frame, w, h);
        self.queue.write_buffer(&res.uniform_buffer, 0, bytemuck::bytes_of(&packed));
        self.stats.uniform_uploads += 1;
        Ok(())
    }

    fn render(&mut self) -> GpuResult<()> {
        let res = self.live()?;
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("adjust_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("adjust_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &res.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&res.pipeline);
            pass.set_bind_group(0, &res.bind_group, &[]);
            pass.set_vertex_buffer(0, res.vertex_buffer.slice(..));
            pass.draw(0..QUAD.len() as u32, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::Maintain::Wait);
        self.rendered = true;
        self.stats.draws += 1;
        Ok(())
    }

    fn read_back(&mut self) -> GpuResult<Bitmap> {
        let res = self.live()?;
        if !self.rendered {
            return Err(GpuError::OperationFailed("read_back before any render".into()));
        }
        let (width, height) = self.dims;

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &res.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &res.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(res.padded_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        // Map and read
        let slice = res.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        self.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|_| GpuError::OperationFailed("Map channel closed".into()))?
            .map_err(|e| GpuError::OperationFailed(format!("Map failed: {e}")))?;

        let row_bytes = width as usize * 4;
        let mut pixels = Vec::with_capacity(row_bytes * height as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks_exact(res.padded_row as usize).take(height as usize) {
                pixels.extend_from_slice(&row[..row_bytes]);
            }
        }
        res.readback.unmap();

        Ok(Bitmap::from_rgba8(width, height, pixels)?)
    }

    fn release(&mut self) {
        if let Some(res) = self.resources.take() {
            res.destroy();
            self.device.poll(wgpu::Maintain::Wait);
            self.stats.releases += 1;
            debug!("wgpu backend: released");
        }
    }

    fn is_released(&self) -> bool {
        self.resources.is_none()
    }

    fn stats(&self) -> BackendStats {
        self.stats
    }
}

impl Drop for WgpuBackend {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// Construction helpers
// =============================================================================

/// Resamples a LUT to exactly `LUT_SIZE` entries.
fn lut_texels(lut: &ToneLut) -> Vec<f32> {
    if lut.resolution() == LUT_SIZE {
        return lut.values().to_vec();
    }
    let scale = (LUT_SIZE - 1) as f32;
    (0..LUT_SIZE).map(|i| lut.sample(i as f32 / scale)).collect()
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn create_pipeline(device: &wgpu::Device) -> GpuResult<(wgpu::RenderPipeline, wgpu::BindGroupLayout)> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("adjust_shader"),
        source: wgpu::ShaderSource::Wgsl(shaders::ADJUST.into()),
    });

    let mut entries = vec![wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ParamsUniform>() as u64),
        },
        count: None,
    }];
    entries.push(texture_entry(1));
    entries.extend(LUT_BINDINGS.iter().map(|&b| texture_entry(b)));

    let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("adjust_bind_layout"),
        entries: &entries,
    });
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("adjust_pipeline_layout"),
        bind_group_layouts: &[&bind_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("adjust_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &VERTEX_ATTRIBUTES,
            }],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(GpuError::ShaderCompilation(err.to_string()));
    }
    Ok((pipeline, bind_layout))
}

fn create_texture(device: &wgpu::Device, label: &str, width: u32, height: u32, format: wgpu::TextureFormat, usage: wgpu::TextureUsages) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    })
}

fn create_resources(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    layout: &wgpu::BindGroupLayout,
    source: &Bitmap,
) -> Resources {
    let (width, height) = source.dimensions();

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("quad_vertices"),
        contents: bytemuck::cast_slice(&QUAD),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("params_uniform"),
        contents: bytemuck::bytes_of(&ParamsUniform::pack(&FrameUniforms::default(), width, height)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let sampled = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
    let source_tex = create_texture(device, "source_texture", width, height, wgpu::TextureFormat::Rgba8Unorm, sampled);
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &source_tex,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        source.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(source.row_bytes() as u32),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
    );

    let luts: [wgpu::Texture; NUM_CHANNELS] = std::array::from_fn(|i| {
        let label = format!("lut_{}", Channel::ALL[i].name());
        create_texture(device, &label, LUT_SIZE as u32, 1, wgpu::TextureFormat::R32Float, sampled)
    });

    let target = create_texture(
        device,
        "render_target",
        width,
        height,
        TARGET_FORMAT,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
    );
    let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_row = (width * 4).div_ceil(align) * align;
    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback_buffer"),
        size: padded_row as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let source_view = source_tex.create_view(&wgpu::TextureViewDescriptor::default());
    let lut_views: Vec<wgpu::TextureView> = luts
        .iter()
        .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()))
        .collect();

    let mut entries = vec![
        wgpu::BindGroupEntry { binding: 0, resource: uniform_buffer.as_entire_binding() },
        wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&source_view) },
    ];
    entries.extend(LUT_BINDINGS.iter().zip(&lut_views).map(|(&binding, view)| wgpu::BindGroupEntry {
        binding,
        resource: wgpu::BindingResource::TextureView(view),
    }));
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("adjust_bind_group"),
        layout,
        entries: &entries,
    });

    Resources {
        pipeline,
        bind_group,
        vertex_buffer,
        uniform_buffer,
        source: source_tex,
        luts,
        target,
        target_view,
        readback,
        padded_row,
    }
}
