//! Backend tests for darkroom-gpu.

use darkroom_core::{Bitmap, Channel};
use darkroom_gpu::{create_backend, Backend, CpuBackend, GpuError, RenderBackend};
use darkroom_lut::{ControlPoint, LutSet, ToneLut, LUT_SIZE};
use darkroom_ops::{render_frame, AdjustmentState, BrushDab, DabMode, FrameUniforms, Param};

fn checker(w: u32, h: u32) -> Bitmap {
    Bitmap::from_fn(w, h, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 { [220, 180, 40, 255] } else { [30, 60, 200, 128] }
    })
    .unwrap()
}

#[test]
fn test_cpu_backend_available() {
    assert!(Backend::Cpu.is_available());
}

#[test]
fn test_auto_backend() {
    let backend = create_backend(Backend::Auto, &checker(8, 8)).unwrap();
    println!("Auto-selected backend: {}", backend.name());
    assert_eq!(backend.dimensions(), (8, 8));
}

#[test]
fn test_cpu_matches_reference_renderer() {
    let src = checker(24, 16);
    let mut adj = AdjustmentState::default();
    adj.set(Param::Contrast, 1.5);
    adj.set(Param::Vignette, 0.4);
    let inverted = ToneLut::from_points(&[ControlPoint::new(0.0, 1.0), ControlPoint::new(1.0, 0.0)], LUT_SIZE);
    let frame = FrameUniforms::new(&adj, None);

    let mut backend = CpuBackend::new(&src).unwrap();
    backend.upload_lut(Channel::Green, &inverted).unwrap();
    backend.set_uniforms(&frame).unwrap();
    backend.render().unwrap();
    let out = backend.read_back().unwrap();

    let mut luts = LutSet::default();
    luts.set(Channel::Green, inverted);
    assert_eq!(out, render_frame(&src, &luts, &frame).unwrap());
}

#[test]
fn test_read_back_before_render_fails() {
    let mut backend = CpuBackend::new(&checker(4, 4)).unwrap();
    assert!(matches!(backend.read_back(), Err(GpuError::OperationFailed(_))));
}

#[test]
fn test_stats_count_work() {
    let mut backend = CpuBackend::new(&checker(4, 4)).unwrap();
    backend.upload_lut(Channel::Red, &ToneLut::default()).unwrap();
    for _ in 0..3 {
        backend.set_uniforms(&FrameUniforms::default()).unwrap();
        backend.render().unwrap();
    }
    let stats = backend.stats();
    assert_eq!(stats.lut_uploads, 1);
    assert_eq!(stats.uniform_uploads, 3);
    assert_eq!(stats.draws, 3);
    assert_eq!(stats.live_allocations(), 1);
}

#[test]
fn test_release_is_idempotent_and_final() {
    let mut backend = CpuBackend::new(&checker(4, 4)).unwrap();
    backend.release();
    backend.release();
    assert!(backend.is_released());
    assert_eq!(backend.stats().releases, 1);
    assert_eq!(backend.stats().live_allocations(), 0);
    assert!(matches!(backend.render(), Err(GpuError::Released)));
    assert!(matches!(backend.upload_lut(Channel::Combined, &ToneLut::default()), Err(GpuError::Released)));
}

#[test]
fn test_brush_rendered_by_backend() {
    let src = Bitmap::filled(32, 32, [0, 0, 0, 255]).unwrap();
    let dab = BrushDab { center: [16.0, 16.0], radius: 6.0, opacity: 1.0, color: [1.0; 3], mode: DabMode::Paint };
    let mut backend = create_backend(Backend::Cpu, &src).unwrap();
    backend.set_uniforms(&FrameUniforms::new(&AdjustmentState::default(), Some(dab))).unwrap();
    backend.render().unwrap();
    let out = backend.read_back().unwrap();
    assert_eq!(out.pixel(16, 16), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
}
