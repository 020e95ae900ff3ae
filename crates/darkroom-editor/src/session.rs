//! Render session: owns the edit state and the render backend.
//!
//! Every state change bumps a generation counter. [`EditorSession::render`]
//! pushes only what changed to the backend (LUTs are re-uploaded per channel
//! when dirty; uniforms go up every frame) and records the generation it drew.
//! Reading back a frame whose generation is behind the state is refused, so
//! an export never returns pixels that predate the last edit.

use darkroom_core::{Bitmap, Channel, NUM_CHANNELS};
use darkroom_gpu::{create_backend, BackendStats, RenderBackend};
use darkroom_lut::{ControlPoint, Curve, CurveSet, LutSet};
use darkroom_ops::{AdjustmentState, FrameUniforms, Param};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

use crate::brush::BrushTool;
use crate::config::{EditorConfig, Preset};
use crate::curve_editor::CurveEditor;
use crate::events::{EditorEvent, Generation};
use crate::{EditorError, EditorResult};

/// Editing session over one source image.
pub struct EditorSession {
    backend: Box<dyn RenderBackend>,
    closed: bool,
    adjustments: AdjustmentState,
    curves: CurveEditor,
    brush: BrushTool,
    generation: Generation,
    rendered: Option<Generation>,
    lut_dirty: [bool; NUM_CHANNELS],
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("backend", &self.backend.name())
            .field("closed", &self.closed)
            .field("generation", &self.generation)
            .field("rendered", &self.rendered)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Opens a session on the backend the config selects.
    pub fn open(source: &Bitmap, config: &EditorConfig) -> EditorResult<Self> {
        let backend = create_backend(config.backend()?, source)?;
        Ok(Self::with_backend(backend, config))
    }

    /// Opens a session on an existing backend.
    pub fn with_backend(backend: Box<dyn RenderBackend>, config: &EditorConfig) -> Self {
        let (w, h) = backend.dimensions();
        info!(backend = backend.name(), width = w, height = h, "session opened");

        let brush = BrushTool::new(config.brush.size, config.brush.opacity, config.brush.color);

        Self {
            backend,
            closed: false,
            adjustments: AdjustmentState::default(),
            curves: CurveEditor::new(config.canvas),
            brush,
            generation: 0,
            rendered: None,
            lut_dirty: [true; NUM_CHANNELS],
        }
    }

    /// Applies one event.
    pub fn handle(&mut self, event: EditorEvent) -> EditorResult<()> {
        self.ensure_open()?;
        trace!(?event, "event");

        let changed = match event {
            EditorEvent::SetParam { param, value } => self.set_param(param, value),
            EditorEvent::ResetParam(param) => {
                self.adjustments.reset(param);
                true
            }
            EditorEvent::ResetParams => {
                self.adjustments = AdjustmentState::default();
                true
            }
            EditorEvent::Curve { channel, event } => {
                match self.curves.handle_pointer(channel, event)? {
                    Some(ch) => {
                        self.mark_lut(ch);
                        true
                    }
                    None => false,
                }
            }
            EditorEvent::SetCurve { channel, curve } => {
                self.curves.set_curve(channel, curve);
                self.mark_lut(channel);
                true
            }
            EditorEvent::ResetCurve(channel) => {
                self.curves.reset_channel(channel);
                self.mark_lut(channel);
                true
            }
            EditorEvent::BrushDown { x, y } => {
                self.brush.pointer_down(x, y);
                self.brush.dab().is_some()
            }
            EditorEvent::BrushMove { x, y } => self.brush.pointer_move(x, y),
            EditorEvent::BrushUp => {
                self.brush.pointer_up();
                false
            }
            EditorEvent::SetBrushMode(mode) => {
                self.brush.set_mode(mode);
                true
            }
            EditorEvent::SetBrushSize(size) => {
                self.brush.set_size(size);
                self.brush.dab().is_some()
            }
            EditorEvent::SetBrushOpacity(opacity) => {
                self.brush.set_opacity(opacity);
                self.brush.dab().is_some()
            }
            EditorEvent::SetBrushColor(color) => {
                self.brush.set_color(color);
                self.brush.dab().is_some()
            }
            EditorEvent::SetViewTransform(view) => {
                self.brush.set_view(view);
                false
            }
            EditorEvent::ApplyPreset(preset) => {
                self.apply_preset(&preset);
                true
            }
        };

        if changed {
            self.generation += 1;
        }
        Ok(())
    }

    fn set_param(&mut self, param: Param, value: f32) -> bool {
        let before = self.adjustments.get(param);
        let stored = self.adjustments.set(param, value);
        if stored != value {
            debug!(%param, requested = value, stored, "parameter clamped");
        }
        stored != before
    }

    fn apply_preset(&mut self, preset: &Preset) {
        self.adjustments = preset.adjustments.clamped();
        self.curves.set_curves(&preset.curves);
        self.lut_dirty = [true; NUM_CHANNELS];
        debug!("preset applied");
    }

    fn mark_lut(&mut self, channel: Channel) {
        self.lut_dirty[channel.index()] = true;
    }

    fn ensure_open(&self) -> EditorResult<()> {
        if self.closed { Err(EditorError::Closed) } else { Ok(()) }
    }

    fn is_stale(&self) -> bool {
        self.rendered != Some(self.generation)
    }

    /// Draws the current state.
    pub fn render(&mut self) -> EditorResult<()> {
        self.ensure_open()?;

        for ch in Channel::ALL {
            if std::mem::take(&mut self.lut_dirty[ch.index()]) {
                if let Err(e) = self.backend.upload_lut(ch, self.curves.luts().get(ch)) {
                    self.lut_dirty[ch.index()] = true;
                    return Err(e.into());
                }
            }
        }

        let frame = FrameUniforms::new(&self.adjustments, self.brush.dab());
        self.backend.set_uniforms(&frame)?;
        self.backend.render()?;
        self.rendered = Some(self.generation);
        trace!(generation = self.generation, "frame rendered");
        Ok(())
    }

    /// Reads the last rendered frame.
    ///
    /// Fails with [`EditorError::StaleFrame`] if the state changed since.
    pub fn read_back(&mut self) -> EditorResult<Bitmap> {
        self.ensure_open()?;
        if self.is_stale() {
            return Err(EditorError::StaleFrame { rendered: self.rendered, current: self.generation });
        }
        Ok(self.backend.read_back()?)
    }

    /// Renders if needed and reads back.
    pub fn export(&mut self) -> EditorResult<Bitmap> {
        self.ensure_open()?;
        if self.is_stale() {
            self.render()?;
        }
        self.read_back()
    }

    /// Releases backend resources. Further calls fail with [`EditorError::Closed`].
    pub fn shutdown(&mut self) {
        if !self.closed {
            self.backend.release();
            self.closed = true;
            info!(backend = self.backend.name(), "session closed");
        }
    }

    /// Closes the session, returning the final backend counters.
    pub fn close(mut self) -> BackendStats {
        self.shutdown();
        self.backend.stats()
    }

    /// Registers a callback run after every curve change with the sorted,
    /// extended points.
    pub fn on_curve_change(&mut self, callback: impl FnMut(Channel, &[ControlPoint]) + Send + 'static) {
        self.curves.on_change(callback);
    }

    /// Current adjustments.
    pub fn adjustments(&self) -> &AdjustmentState {
        &self.adjustments
    }

    /// Curve editor.
    pub fn curve_editor(&self) -> &CurveEditor {
        &self.curves
    }

    /// Curve for one channel.
    pub fn curve(&self, channel: Channel) -> &Curve {
        self.curves.curve(channel)
    }

    /// All curves.
    pub fn curves(&self) -> &CurveSet {
        self.curves.curves()
    }

    /// Current LUTs.
    pub fn luts(&self) -> &LutSet {
        self.curves.luts()
    }

    /// Brush tool.
    pub fn brush(&self) -> &BrushTool {
        &self.brush
    }

    /// Current state as a preset.
    pub fn preset(&self) -> Preset {
        Preset { adjustments: self.adjustments, curves: self.curves.curves().clone() }
    }

    /// State generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Generation of the last completed render.
    pub fn rendered_generation(&self) -> Option<Generation> {
        self.rendered
    }

    /// Backend name.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Image size.
    pub fn dimensions(&self) -> (u32, u32) {
        self.backend.dimensions()
    }

    /// Backend counters.
    pub fn stats(&self) -> BackendStats {
        self.backend.stats()
    }

    /// True after [`EditorSession::shutdown`].
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
