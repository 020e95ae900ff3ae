//! Session configuration and adjustment presets (YAML).
//!
//! ```yaml
//! backend: auto
//! canvas:
//!   width: 256
//!   height: 256
//!   handle_radius: 6
//! brush:
//!   size: 25
//!   opacity: 1.0
//!   color: white
//! ```
//!
//! Every field is optional. A preset carries adjustment values and curves:
//!
//! ```yaml
//! adjustments:
//!   exposure: 0.2
//!   hue: 45
//! curves:
//!   red: [{x: 0.0, y: 0.1}, {x: 1.0, y: 1.0}]
//! ```

use std::path::Path;

use darkroom_gpu::Backend;
use darkroom_lut::CurveSet;
use darkroom_ops::AdjustmentState;
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::brush::BrushColor;
use crate::curve_editor::CurveCanvas;
use crate::{EditorError, EditorResult};

/// Brush defaults applied when a session opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushDefaults {
    /// Radius in image pixels.
    pub size: f32,
    /// Peak opacity.
    pub opacity: f32,
    /// Paint colour.
    pub color: BrushColor,
}

impl Default for BrushDefaults {
    fn default() -> Self {
        Self { size: 25.0, opacity: 1.0, color: BrushColor::White }
    }
}

/// Editor session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Backend name: `auto`, `cpu` or `wgpu`. `DARKROOM_BACKEND` overrides it.
    pub backend: String,
    /// Curve editor canvas.
    pub canvas: CurveCanvas,
    /// Brush defaults.
    pub brush: BrushDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            backend: "auto".into(),
            canvas: CurveCanvas::default(),
            brush: BrushDefaults::default(),
        }
    }
}

impl EditorConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> EditorResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> EditorResult<Self> {
        Self::from_yaml_str(&read(path.as_ref())?)
    }

    /// Backend selection: the configured value, then the environment override.
    pub fn backend(&self) -> EditorResult<Backend> {
        let configured: Backend = self.backend.parse()?;
        Ok(configured.with_override(std::env::var(darkroom_gpu::BACKEND_ENV).ok().as_deref()))
    }
}

/// Saved adjustment values and curves.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Adjustment values; out-of-range entries are clamped when applied.
    pub adjustments: AdjustmentState,
    /// Per-channel curves.
    pub curves: CurveSet,
}

impl Preset {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> EditorResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> EditorResult<Self> {
        Self::from_yaml_str(&read(path.as_ref())?)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> EditorResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn read(path: &Path) -> EditorResult<String> {
    debug!(path = %path.display(), "loading");
    std::fs::read_to_string(path).map_err(|source| EditorError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkroom_core::Channel;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = EditorConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, EditorConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let cfg = EditorConfig::from_yaml_str("backend: cpu\nbrush:\n  color: black\n").unwrap();
        assert_eq!(cfg.backend, "cpu");
        assert_eq!(cfg.brush.color, BrushColor::Black);
        assert_eq!(cfg.brush.size, 25.0);
    }

    #[test]
    fn test_bad_backend_name() {
        let cfg = EditorConfig { backend: "vulkan9".into(), ..Default::default() };
        assert!(cfg.backend().is_err());
    }

    #[test]
    fn test_preset_parse() {
        let p = Preset::from_yaml_str("adjustments:\n  hue: 45\ncurves:\n  red: [{x: 0.0, y: 0.2}, {x: 1.0, y: 1.0}]\n")
            .unwrap();
        assert_eq!(p.adjustments.hue, 45.0);
        assert_eq!(p.adjustments.exposure, 0.0);
        assert_eq!(p.curves.get(Channel::Red).points()[0].y, 0.2);
        assert!(p.curves.get(Channel::Green).is_identity());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Preset::from_file("/nonexistent/preset.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/preset.yaml"));
    }
}
