//! CLI command implementations

pub mod lut;
pub mod params;
pub mod render;

use anyhow::{Context, Result, bail};
use darkroom_core::{Bitmap, Channel};
use darkroom_lut::{ControlPoint, Curve};
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Bitmap> {
    let img = image::open(path)
        .with_context(|| format!("Failed to load: {}", path.display()))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    Bitmap::from_rgba8(w, h, img.into_raw()).with_context(|| format!("Invalid image: {}", path.display()))
}

/// Save image to path. Formats without alpha drop it.
pub fn save_image(path: &Path, bitmap: Bitmap) -> Result<()> {
    let (w, h) = bitmap.dimensions();
    let img = image::RgbaImage::from_raw(w, h, bitmap.into_raw()).context("Output buffer size mismatch")?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let result = match ext.as_str() {
        "jpg" | "jpeg" => image::DynamicImage::ImageRgba8(img).to_rgb8().save(path),
        _ => img.save(path),
    };
    result.with_context(|| format!("Failed to save: {}", path.display()))
}

/// Parse `x,y`
pub fn parse_position(s: &str) -> Result<[f32; 2]> {
    let (x, y) = s.split_once(',').with_context(|| format!("Expected x,y, got '{s}'"))?;
    Ok([parse_f32(x)?, parse_f32(y)?])
}

/// Parse `x:y,x:y,...` (empty string gives no points)
pub fn parse_points(s: &str) -> Result<Vec<ControlPoint>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (x, y) = p.split_once(':').with_context(|| format!("Expected x:y, got '{p}'"))?;
            Ok(ControlPoint::new(parse_f32(x)?, parse_f32(y)?))
        })
        .collect()
}

/// Parse `channel=x:y,...`
pub fn parse_curve(s: &str) -> Result<(Channel, Curve)> {
    let (channel, points) = s.split_once('=').with_context(|| format!("Expected channel=points, got '{s}'"))?;
    let channel: Channel = channel.trim().parse().with_context(|| format!("Unknown channel '{channel}'"))?;
    Ok((channel, Curve::new(parse_points(points)?)))
}

fn parse_f32(s: &str) -> Result<f32> {
    let v: f32 = s.trim().parse().with_context(|| format!("Not a number: '{s}'"))?;
    if !v.is_finite() {
        bail!("Not a finite number: '{s}'");
    }
    Ok(v)
}
