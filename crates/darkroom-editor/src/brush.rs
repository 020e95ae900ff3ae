//! Retouch brush tool.
//!
//! Turns pointer events into at most one [`BrushDab`] per frame.
//!
//! ```text
//! Idle --down--> Painting --move*--> Painting --up--> Idle
//!   |                                   (paint, heal, anchored clone)
//!   +--down (clone, no source yet)--> Anchoring --up--> Idle
//! ```
//!
//! The clone source lives inside [`ModeState::Clone`], so it cannot outlive
//! clone mode. Each clone stroke fixes its offset (source minus the
//! stroke-start position) at pointer-down and keeps it while the pointer
//! moves, so the sampled patch travels with the brush. The most recent dab stays composited after pointer-up; it is
//! redrawn each frame, not accumulated.

use std::fmt;
use std::str::FromStr;

use darkroom_core::clamp01;
use darkroom_ops::{BrushDab, DabMode};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::EditorError;

/// Flat paint colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushColor {
    /// Pure white.
    #[default]
    White,
    /// Pure black.
    Black,
}

impl BrushColor {
    /// Colour as linear RGB.
    pub const fn rgb(self) -> [f32; 3] {
        match self {
            BrushColor::White => [1.0; 3],
            BrushColor::Black => [0.0; 3],
        }
    }
}

impl FromStr for BrushColor {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(BrushColor::White),
            "black" => Ok(BrushColor::Black),
            other => Err(invalid(format!("unknown brush colour '{other}'"))),
        }
    }
}

/// User-selectable brush mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushMode {
    /// Flat colour.
    #[default]
    Paint,
    /// Copy from an anchored source.
    Clone,
    /// Blend with the surrounding area.
    Heal,
}

impl fmt::Display for BrushMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BrushMode::Paint => "paint",
            BrushMode::Clone => "clone",
            BrushMode::Heal => "heal",
        })
    }
}

impl FromStr for BrushMode {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paint" => Ok(BrushMode::Paint),
            "clone" => Ok(BrushMode::Clone),
            "heal" => Ok(BrushMode::Heal),
            other => Err(invalid(format!("unknown brush mode '{other}'"))),
        }
    }
}

/// Clone source progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClonePhase {
    /// Waiting for the pointer-down that picks the source.
    Pending,
    /// Source anchored at an image position.
    Anchored {
        /// Anchored source position.
        source: [f32; 2],
        /// Offset locked at the start of the current stroke, if one has begun.
        offset: Option<[f32; 2]>,
    },
}

/// Active mode with its mode-specific state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeState {
    /// Flat colour.
    Paint,
    /// Copy from a source position.
    Clone(ClonePhase),
    /// Smoothing blend.
    Heal,
}

impl ModeState {
    /// The user-facing mode.
    pub fn mode(&self) -> BrushMode {
        match self {
            ModeState::Paint => BrushMode::Paint,
            ModeState::Clone(_) => BrushMode::Clone,
            ModeState::Heal => BrushMode::Heal,
        }
    }

    fn enter(mode: BrushMode) -> Self {
        match mode {
            BrushMode::Paint => ModeState::Paint,
            BrushMode::Clone => ModeState::Clone(ClonePhase::Pending),
            BrushMode::Heal => ModeState::Heal,
        }
    }
}

/// Pointer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushPhase {
    /// No button held.
    #[default]
    Idle,
    /// Button held, dabs follow the pointer.
    Painting,
    /// Button held after anchoring a clone source; nothing is painted.
    Anchoring,
}

/// Maps display-canvas device pixels to image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Image pixels per device pixel, per axis.
    pub scale: [f32; 2],
    /// Image position of the canvas origin.
    pub offset: [f32; 2],
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { scale: [1.0, 1.0], offset: [0.0, 0.0] }
    }
}

impl ViewTransform {
    /// Transform for an image of `image` size shown on a canvas of `canvas`
    /// size, stretched to fill.
    pub fn fit(image: (u32, u32), canvas: (f32, f32)) -> Self {
        let sx = if canvas.0 > 0.0 { image.0 as f32 / canvas.0 } else { 1.0 };
        let sy = if canvas.1 > 0.0 { image.1 as f32 / canvas.1 } else { 1.0 };
        Self { scale: [sx, sy], offset: [0.0, 0.0] }
    }

    /// Device pixel to image pixel.
    #[inline]
    pub fn to_image(&self, x: f32, y: f32) -> [f32; 2] {
        [x * self.scale[0] + self.offset[0], y * self.scale[1] + self.offset[1]]
    }
}

/// Brush settings and pointer state.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushTool {
    size: f32,
    opacity: f32,
    color: BrushColor,
    mode: ModeState,
    phase: BrushPhase,
    dab: Option<[f32; 2]>,
    view: ViewTransform,
}

impl Default for BrushTool {
    fn default() -> Self {
        Self::new(25.0, 1.0, BrushColor::White)
    }
}

impl BrushTool {
    /// Smallest accepted brush radius.
    pub const MIN_SIZE: f32 = 1.0;

    /// New tool in paint mode.
    pub fn new(size: f32, opacity: f32, color: BrushColor) -> Self {
        Self {
            size: sanitize_size(size),
            opacity: clamp01(opacity),
            color,
            mode: ModeState::Paint,
            phase: BrushPhase::Idle,
            dab: None,
            view: ViewTransform::default(),
        }
    }

    /// Brush radius in image pixels.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Peak opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Paint colour.
    pub fn color(&self) -> BrushColor {
        self.color
    }

    /// Mode with its state.
    pub fn mode_state(&self) -> ModeState {
        self.mode
    }

    /// User-facing mode.
    pub fn mode(&self) -> BrushMode {
        self.mode.mode()
    }

    /// Pointer phase.
    pub fn phase(&self) -> BrushPhase {
        self.phase
    }

    /// Anchored clone source, if any.
    pub fn clone_source(&self) -> Option<[f32; 2]> {
        match self.mode {
            ModeState::Clone(ClonePhase::Anchored { source, .. }) => Some(source),
            _ => None,
        }
    }

    /// Sets the radius (at least [`Self::MIN_SIZE`]).
    pub fn set_size(&mut self, size: f32) {
        self.size = sanitize_size(size);
    }

    /// Sets the opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = clamp01(opacity);
    }

    /// Sets the paint colour.
    pub fn set_color(&mut self, color: BrushColor) {
        self.color = color;
    }

    /// Sets the device-to-image mapping.
    pub fn set_view(&mut self, view: ViewTransform) {
        self.view = view;
    }

    /// Switches mode.
    ///
    /// Always ends the current stroke and hides the dab. Entering clone
    /// mode (even from clone mode) waits for a new source.
    pub fn set_mode(&mut self, mode: BrushMode) {
        self.mode = ModeState::enter(mode);
        self.phase = BrushPhase::Idle;
        self.dab = None;
        debug!(mode = %mode, "brush mode");
    }

    /// Pointer pressed at device position `(x, y)`.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let pos = self.view.to_image(x, y);
        match self.mode {
            ModeState::Clone(ClonePhase::Pending) => {
                self.mode = ModeState::Clone(ClonePhase::Anchored { source: pos, offset: None });
                self.phase = BrushPhase::Anchoring;
                trace!(x = pos[0], y = pos[1], "clone source anchored");
            }
            ModeState::Clone(ClonePhase::Anchored { source, .. }) => {
                let offset = [source[0] - pos[0], source[1] - pos[1]];
                self.mode = ModeState::Clone(ClonePhase::Anchored { source, offset: Some(offset) });
                self.phase = BrushPhase::Painting;
                self.dab = Some(pos);
                trace!(x = pos[0], y = pos[1], dx = offset[0], dy = offset[1], "clone stroke");
            }
            _ => {
                self.phase = BrushPhase::Painting;
                self.dab = Some(pos);
                trace!(x = pos[0], y = pos[1], "brush down");
            }
        }
    }

    /// Pointer moved. Returns true if the dab moved.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if self.phase != BrushPhase::Painting {
            return false;
        }
        self.dab = Some(self.view.to_image(x, y));
        true
    }

    /// Pointer released. The last dab stays visible.
    pub fn pointer_up(&mut self) {
        self.phase = BrushPhase::Idle;
    }

    /// Dab to composite this frame.
    pub fn dab(&self) -> Option<BrushDab> {
        let center = self.dab?;
        let mode = match self.mode {
            ModeState::Paint => DabMode::Paint,
            ModeState::Heal => DabMode::Heal,
            ModeState::Clone(ClonePhase::Anchored { offset: Some(offset), .. }) => DabMode::Clone { offset },
            ModeState::Clone(_) => return None,
        };
        Some(BrushDab {
            center,
            radius: self.size,
            opacity: self.opacity,
            color: self.color.rgb(),
            mode,
        })
    }
}

fn invalid(msg: String) -> EditorError {
    EditorError::Ops(darkroom_ops::OpsError::InvalidParameter(msg))
}

fn sanitize_size(size: f32) -> f32 {
    if size.is_finite() { size.max(BrushTool::MIN_SIZE) } else { BrushTool::MIN_SIZE }
}
