//! Interactive tone-curve editor.
//!
//! Holds one [`Curve`] per channel, translates canvas pointer events into
//! curve edits and keeps each channel's [`ToneLut`](darkroom_lut::ToneLut)
//! in step with its curve.
//!
//! Pointer rules, per channel:
//!
//! - down on a handle starts dragging it
//! - down anywhere else adds a point there (no drag)
//! - move while dragging moves the dragged point
//! - up ends the drag
//! - context-menu on a handle deletes it; elsewhere it does nothing
//!
//! There is a single pointer, so a down on any channel ends the drags of all
//! the others and at most one channel is ever dragging.
//!
//! Point indices are insertion order and never change when a drag crosses a
//! neighbour in x, so a drag keeps its target for its whole duration.

use std::fmt;

use darkroom_core::{Channel, NUM_CHANNELS, clamp01};
use darkroom_lut::{ControlPoint, Curve, CurveOverlay, CurveSet, LUT_SIZE, LutSet};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::EditorResult;

/// Curve editor canvas geometry in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveCanvas {
    /// Canvas width.
    pub width: f32,
    /// Canvas height.
    pub height: f32,
    /// Handle hit radius.
    pub handle_radius: f32,
}

impl Default for CurveCanvas {
    fn default() -> Self {
        Self { width: 256.0, height: 256.0, handle_radius: 6.0 }
    }
}

impl CurveCanvas {
    /// Canvas position to curve space. The canvas y axis points down.
    pub fn to_normalized(&self, x: f32, y: f32) -> ControlPoint {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        ControlPoint::new(clamp01(x / w), clamp01(1.0 - y / h))
    }

    /// Curve space to canvas position.
    pub fn to_canvas(&self, p: ControlPoint) -> (f32, f32) {
        (p.x * self.width, (1.0 - p.y) * self.height)
    }

    /// Index of the handle nearest `(x, y)` within the hit radius.
    pub fn hit_test(&self, points: &[ControlPoint], x: f32, y: f32) -> Option<usize> {
        let r2 = self.handle_radius * self.handle_radius;
        points
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let (px, py) = self.to_canvas(p);
                (i, (px - x).powi(2) + (py - y).powi(2))
            })
            .filter(|&(_, d2)| d2 <= r2)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

/// Pointer input on the curve canvas, in canvas device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed.
    Down {
        /// Canvas x.
        x: f32,
        /// Canvas y.
        y: f32,
    },
    /// Pointer moved.
    Move {
        /// Canvas x.
        x: f32,
        /// Canvas y.
        y: f32,
    },
    /// Primary button released.
    Up,
    /// Secondary click.
    ContextMenu {
        /// Canvas x.
        x: f32,
        /// Canvas y.
        y: f32,
    },
}

/// Drag state for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// Nothing held.
    #[default]
    Idle,
    /// Dragging the point at this index.
    Dragging(usize),
}

/// Called with the sorted, extended points after every curve change.
pub type CurveCallback = Box<dyn FnMut(Channel, &[ControlPoint]) + Send>;

/// Four-channel curve editor.
pub struct CurveEditor {
    canvas: CurveCanvas,
    curves: CurveSet,
    luts: LutSet,
    drag: [DragState; NUM_CHANNELS],
    on_change: Option<CurveCallback>,
}

impl fmt::Debug for CurveEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveEditor")
            .field("canvas", &self.canvas)
            .field("curves", &self.curves)
            .field("drag", &self.drag)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl Default for CurveEditor {
    fn default() -> Self {
        Self::new(CurveCanvas::default())
    }
}

impl CurveEditor {
    /// Editor with default curves on every channel.
    pub fn new(canvas: CurveCanvas) -> Self {
        let curves = CurveSet::default();
        let luts = curves.to_luts(LUT_SIZE);
        Self { canvas, curves, luts, drag: [DragState::Idle; NUM_CHANNELS], on_change: None }
    }

    /// Canvas geometry.
    pub fn canvas(&self) -> &CurveCanvas {
        &self.canvas
    }

    /// All curves.
    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    /// Curve for one channel.
    pub fn curve(&self, channel: Channel) -> &Curve {
        self.curves.get(channel)
    }

    /// Current LUTs, always in step with the curves.
    pub fn luts(&self) -> &LutSet {
        &self.luts
    }

    /// Drag state for one channel.
    pub fn drag_state(&self, channel: Channel) -> DragState {
        self.drag[channel.index()]
    }

    /// Registers the change callback, replacing any previous one.
    pub fn on_change(&mut self, callback: impl FnMut(Channel, &[ControlPoint]) + Send + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Applies a pointer event to `channel`'s curve.
    ///
    /// Returns the channel if its curve (and so its LUT) changed.
    pub fn handle_pointer(&mut self, channel: Channel, event: PointerEvent) -> EditorResult<Option<Channel>> {
        let slot = channel.index();
        match (event, self.drag[slot]) {
            (PointerEvent::Down { x, y }, _) => {
                for (i, drag) in self.drag.iter_mut().enumerate() {
                    if i != slot {
                        *drag = DragState::Idle;
                    }
                }
                let hit = self.canvas.hit_test(self.curve(channel).points(), x, y);
                match hit {
                    Some(index) => {
                        trace!(%channel, index, "drag start");
                        self.drag[slot] = DragState::Dragging(index);
                        Ok(None)
                    }
                    None => {
                        let (curve, index) = self.curve(channel).add_point(self.canvas.to_normalized(x, y));
                        debug!(%channel, index, "point added");
                        self.drag[slot] = DragState::Idle;
                        self.commit(channel, curve);
                        Ok(Some(channel))
                    }
                }
            }
            (PointerEvent::Move { x, y }, DragState::Dragging(index)) => {
                let curve = self.curve(channel).move_point(index, self.canvas.to_normalized(x, y))?;
                self.commit(channel, curve);
                Ok(Some(channel))
            }
            (PointerEvent::Move { .. }, DragState::Idle) => Ok(None),
            (PointerEvent::Up, _) => {
                self.drag[slot] = DragState::Idle;
                Ok(None)
            }
            (PointerEvent::ContextMenu { x, y }, drag) => {
                let Some(index) = self.canvas.hit_test(self.curve(channel).points(), x, y) else {
                    return Ok(None);
                };
                let curve = self.curve(channel).remove_point(index)?;
                self.drag[slot] = match drag {
                    DragState::Dragging(d) if d == index => DragState::Idle,
                    DragState::Dragging(d) if d > index => DragState::Dragging(d - 1),
                    other => other,
                };
                debug!(%channel, index, "point removed");
                self.commit(channel, curve);
                Ok(Some(channel))
            }
        }
    }

    /// Replaces a channel's curve.
    pub fn set_curve(&mut self, channel: Channel, curve: Curve) {
        self.drag[channel.index()] = DragState::Idle;
        let curve = Curve::new(curve.points().iter().map(|p| p.clamped()).collect());
        self.commit(channel, curve);
    }

    /// Restores a channel's curve to `(0, 0), (1, 1)`.
    pub fn reset_channel(&mut self, channel: Channel) {
        self.set_curve(channel, Curve::default());
    }

    /// Replaces every curve.
    pub fn set_curves(&mut self, curves: &CurveSet) {
        for ch in Channel::ALL {
            self.set_curve(ch, curves.get(ch).clone());
        }
    }

    /// Drawing geometry for one channel on this editor's canvas.
    pub fn overlay(&self, channel: Channel) -> CurveOverlay {
        CurveOverlay::build(self.curve(channel), self.canvas.width, self.canvas.height, 4, 128)
    }

    fn commit(&mut self, channel: Channel, curve: Curve) {
        self.luts.set(channel, curve.to_lut(LUT_SIZE));
        if let Some(callback) = self.on_change.as_mut() {
            callback(channel, &curve.extended());
        }
        self.curves.set(channel, curve);
    }
}
