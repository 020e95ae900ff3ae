//! GPU context and device management

use std::sync::Arc;
use wgpu::{DeviceDescriptor, Features, Instance};

use crate::{GpuError, GpuResult};

/// GPU context holding device and queue
pub struct GpuContext {
    pub(crate) device: Arc<wgpu::Device>,
    pub(crate) queue: Arc<wgpu::Queue>,
    adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Create new GPU context with default settings
    pub fn new() -> GpuResult<Self> {
        pollster::block_on(Self::new_async())
    }

    /// Check if any adapter is available.
    pub fn is_available() -> bool {
        pollster::block_on(async { Self::request_adapter().await.is_some() })
    }

    async fn request_adapter() -> Option<wgpu::Adapter> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
    }

    async fn new_async() -> GpuResult<Self> {
        let adapter = Self::request_adapter().await.ok_or(GpuError::NoAdapter)?;
        let adapter_info = adapter.get_info();

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("darkroom-gpu"),
                    required_features: Features::empty(),
                    required_limits: adapter.limits(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| GpuError::DeviceCreation(e.to_string()))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
        })
    }

    /// Adapter name, e.g. "NVIDIA GeForce RTX 4090".
    pub fn adapter_name(&self) -> &str {
        &self.adapter_info.name
    }

    /// Graphics API the adapter runs on.
    pub fn api(&self) -> wgpu::Backend {
        self.adapter_info.backend
    }

    /// Largest supported 2D texture side.
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}
