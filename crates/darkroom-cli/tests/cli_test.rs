//! End-to-end tests of the `darkroom` binary.

use std::path::Path;
use std::process::Command;

fn darkroom() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_darkroom"));
    cmd.env_remove("DARKROOM_BACKEND").env_remove("RUST_LOG");
    cmd
}

fn write_png(path: &Path, w: u32, h: u32, f: impl Fn(u32, u32) -> [u8; 4]) {
    let img = image::RgbaImage::from_fn(w, h, |x, y| image::Rgba(f(x, y)));
    img.save(path).unwrap();
}

fn read_png(path: &Path) -> image::RgbaImage {
    image::open(path).unwrap().to_rgba8()
}

#[test]
fn test_render_inverted_curve() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    write_png(&input, 16, 8, |x, y| [(x * 15) as u8, (y * 30) as u8, 100, 255]);

    let status = darkroom()
        .args(["render", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .args(["--backend", "cpu", "--curve", "combined=0:1,1:0"])
        .status()
        .unwrap();
    assert!(status.success());

    let src = read_png(&input);
    let out = read_png(&output);
    for (a, b) in src.pixels().zip(out.pixels()) {
        for c in 0..3 {
            assert!((255 - a[c] as i32 - b[c] as i32).abs() <= 1);
        }
        assert_eq!(a[3], b[3]);
    }
}

#[test]
fn test_render_neutral_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    write_png(&input, 9, 9, |x, y| [(x * 28) as u8, (y * 28) as u8, ((x + y) * 14) as u8, 200]);

    let status = darkroom()
        .args(["render", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "-b", "cpu"])
        .args(["--set", "gamma=1", "--set", "contrast=1"])
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(read_png(&input), read_png(&output));
}

#[test]
fn test_render_with_preset_and_brush() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    let preset = dir.path().join("look.yaml");
    write_png(&input, 32, 32, |_, _| [0, 0, 0, 255]);
    std::fs::write(&preset, "adjustments:\n  saturation: 0.5\n").unwrap();

    let status = darkroom()
        .args(["render", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "--backend", "cpu"])
        .args(["--preset", preset.to_str().unwrap(), "--brush", "16,16", "--brush-size", "4"])
        .status()
        .unwrap();
    assert!(status.success());
    let out = read_png(&output);
    assert_eq!(out.get_pixel(16, 16).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn test_clone_without_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    write_png(&input, 8, 8, |_, _| [10, 10, 10, 255]);

    let out = darkroom()
        .args(["render", input.to_str().unwrap(), "-o", dir.path().join("o.png").to_str().unwrap()])
        .args(["--backend", "cpu", "--brush", "4,4", "--brush-mode", "clone"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("clone-source"));
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = darkroom()
        .args(["render", "/nonexistent/in.png", "-o", dir.path().join("o.png").to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to load"));
}

#[test]
fn test_lut_command_prints_table() {
    let out = darkroom().args(["lut", "--points", "0.5:0.3", "--resolution", "3"]).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    let rows: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(rows, vec!["0.000000\t0.300000", "0.500000\t0.300000", "1.000000\t0.300000"]);
}

#[test]
fn test_params_lists_everything() {
    let out = darkroom().arg("params").output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    for name in ["exposure", "gamma", "hue", "color_noise_reduction", "grain"] {
        assert!(text.contains(name), "missing {name}");
    }
}
