//! Events accepted by an [`EditorSession`](crate::EditorSession).

use darkroom_core::Channel;
use darkroom_lut::Curve;
use darkroom_ops::Param;

use crate::brush::{BrushColor, BrushMode, ViewTransform};
use crate::config::Preset;
use crate::curve_editor::PointerEvent;

/// State generation counter. A frame rendered at an older generation is stale.
pub type Generation = u64;

/// User input and programmatic edits.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// Set one adjustment (clamped into range).
    SetParam {
        /// Adjustment to change.
        param: Param,
        /// Requested value.
        value: f32,
    },

    /// Reset one adjustment to its default.
    ResetParam(Param),

    /// Reset every adjustment.
    ResetParams,

    /// Pointer input on a channel's curve canvas.
    Curve {
        /// Channel whose canvas received the event.
        channel: Channel,
        /// Canvas pointer event.
        event: PointerEvent,
    },

    /// Replace a channel's curve.
    SetCurve {
        /// Channel to replace.
        channel: Channel,
        /// New curve.
        curve: Curve,
    },

    /// Reset a channel's curve.
    ResetCurve(Channel),

    /// Brush pressed at a display position.
    BrushDown {
        /// Display x.
        x: f32,
        /// Display y.
        y: f32,
    },

    /// Brush moved.
    BrushMove {
        /// Display x.
        x: f32,
        /// Display y.
        y: f32,
    },

    /// Brush released.
    BrushUp,

    /// Change brush mode.
    SetBrushMode(BrushMode),

    /// Brush radius in image pixels.
    SetBrushSize(f32),

    /// Brush opacity.
    SetBrushOpacity(f32),

    /// Paint colour.
    SetBrushColor(BrushColor),

    /// Display-to-image mapping for brush input.
    SetViewTransform(ViewTransform),

    /// Replace adjustments and curves with a preset.
    ApplyPreset(Box<Preset>),
}
