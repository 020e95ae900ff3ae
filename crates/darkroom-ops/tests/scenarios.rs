//! End-to-end pipeline scenarios on the CPU renderer.

use darkroom_core::{Bitmap, Channel};
use darkroom_lut::{ControlPoint, Curve, CurveSet, LutSet, LUT_SIZE};
use darkroom_ops::{render_frame, AdjustmentState, BrushDab, DabMode, FrameUniforms, Param};

fn photo(w: u32, h: u32) -> Bitmap {
    Bitmap::from_fn(w, h, |x, y| {
        [
            (x * 255 / (w - 1)) as u8,
            (y * 255 / (h - 1)) as u8,
            ((x ^ y) * 13 % 256) as u8,
            255,
        ]
    })
    .unwrap()
}

fn busy_state() -> AdjustmentState {
    let mut s = AdjustmentState::default();
    s.set(Param::Sharpening, 0.3);
    s.set(Param::NoiseReduction, 0.2);
    s.set(Param::Saturation, 1.4);
    s.set(Param::Exposure, 0.1);
    s.set(Param::Contrast, 1.2);
    s.set(Param::Shadows, 0.2);
    s.set(Param::Highlights, -0.3);
    s.set(Param::Gamma, 1.3);
    s.set(Param::Warmth, 0.4);
    s.set(Param::Hue, 25.0);
    s.set(Param::ColorNoiseReduction, 0.1);
    s.set(Param::Vignette, 0.6);
    s.set(Param::Dehaze, 0.2);
    s.set(Param::Grain, 0.5);
    s
}

#[test]
fn test_inverted_combined_curve_inverts_tones() {
    let src = photo(64, 48);
    let mut curves = CurveSet::default();
    curves.set(
        Channel::Combined,
        Curve::new(vec![ControlPoint::new(0.0, 1.0), ControlPoint::new(1.0, 0.0)]),
    );
    let out = render_frame(&src, &curves.to_luts(LUT_SIZE), &FrameUniforms::default()).unwrap();

    for (a, b) in src.as_raw().chunks_exact(4).zip(out.as_raw().chunks_exact(4)) {
        for c in 0..3 {
            let expected = 255 - a[c] as i32;
            assert!((b[c] as i32 - expected).abs() <= 1, "{} vs {}", b[c], expected);
        }
        assert_eq!(a[3], b[3]);
    }
}

#[test]
fn test_white_paint_dab_at_centre() {
    let src = Bitmap::filled(101, 101, [40, 90, 140, 255]).unwrap();
    let dab = BrushDab {
        center: [50.0, 50.0],
        radius: 50.0,
        opacity: 1.0,
        color: [1.0; 3],
        mode: DabMode::Paint,
    };
    let frame = FrameUniforms::new(&AdjustmentState::default(), Some(dab));
    let out = render_frame(&src, &LutSet::default(), &frame).unwrap();

    assert_eq!(out.pixel(50, 50), Some([255, 255, 255, 255]));
    // Farther than the radius: untouched by the brush stage.
    assert_eq!(out.pixel(0, 0), src.pixel(0, 0));
    assert_eq!(out.pixel(100, 100), src.pixel(100, 100));
    // Exactly on the radius the weight is zero.
    assert_eq!(out.pixel(50, 0), src.pixel(50, 0));
}

#[test]
fn test_identity_curve_and_neutral_params_are_noop() {
    let src = photo(37, 29);
    let mut curves = CurveSet::default();
    curves.set(
        Channel::Combined,
        Curve::new(vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)]),
    );
    let out = render_frame(&src, &curves.to_luts(LUT_SIZE), &FrameUniforms::default()).unwrap();
    assert_eq!(out.max_abs_diff(&src), Some(0));
}

#[test]
fn test_out_of_range_params_behave_as_boundaries() {
    let src = photo(16, 16);
    let mut wild = AdjustmentState::default();
    let mut edge = AdjustmentState::default();
    for (i, &p) in Param::ALL.iter().enumerate() {
        let r = p.range();
        if i % 2 == 0 {
            wild.set(p, r.max + 100.0);
            edge.set(p, r.max);
        } else {
            wild.set(p, r.min - 100.0);
            edge.set(p, r.min);
        }
    }
    let a = FrameUniforms::new(&wild, None);
    let b = FrameUniforms::new(&edge, None);
    assert_eq!(a, b);

    let luts = LutSet::default();
    assert_eq!(render_frame(&src, &luts, &a).unwrap(), render_frame(&src, &luts, &b).unwrap());
}

#[test]
fn test_direct_field_writes_are_clamped_by_frame() {
    let raw = AdjustmentState { contrast: 9.0, hue: -999.0, ..Default::default() };
    let frame = FrameUniforms::new(&raw, None);
    assert_eq!(frame.adjustments.contrast, 2.0);
    assert_eq!(frame.adjustments.hue, -180.0);
}

#[test]
fn test_repeated_renders_are_identical() {
    let src = photo(48, 32);
    let frame = FrameUniforms::new(&busy_state(), None);
    let luts = LutSet::default();
    let first = render_frame(&src, &luts, &frame).unwrap();
    for _ in 0..3 {
        assert_eq!(render_frame(&src, &luts, &frame).unwrap(), first);
    }
}

#[test]
fn test_grain_depends_on_position() {
    let src = Bitmap::filled(16, 1, [128, 128, 128, 255]).unwrap();
    let mut s = AdjustmentState::default();
    s.set(Param::Grain, 1.0);
    let out = render_frame(&src, &LutSet::default(), &FrameUniforms::new(&s, None)).unwrap();
    let reds: Vec<u8> = (0..16).map(|x| out.pixel(x, 0).unwrap()[0]).collect();
    assert!(reds.iter().any(|&r| r != reds[0]));
}
