//! # darkroom-editor
//!
//! Interactive editing on top of the darkroom render backends.
//!
//! - [`CurveEditor`] turns pointer input into tone-curve edits and keeps the
//!   per-channel LUTs current
//! - [`BrushTool`] turns pointer input into paint, clone and heal dabs
//! - [`EditorSession`] owns the state and a render backend, and redraws with
//!   the minimum of uploads
//!
//! # Example
//!
//! ```rust
//! use darkroom_core::{Bitmap, Channel};
//! use darkroom_editor::{EditorConfig, EditorEvent, EditorSession};
//! use darkroom_lut::{ControlPoint, Curve};
//! use darkroom_ops::Param;
//!
//! let image = Bitmap::filled(16, 16, [128, 64, 32, 255]).unwrap();
//! let config = EditorConfig { backend: "cpu".into(), ..Default::default() };
//! let mut session = EditorSession::open(&image, &config).unwrap();
//!
//! session.handle(EditorEvent::SetParam { param: Param::Saturation, value: 0.0 }).unwrap();
//! session
//!     .handle(EditorEvent::SetCurve {
//!         channel: Channel::Combined,
//!         curve: Curve::new(vec![ControlPoint::new(0.0, 1.0), ControlPoint::new(1.0, 0.0)]),
//!     })
//!     .unwrap();
//!
//! let out = session.export().unwrap();
//! assert_eq!(out.dimensions(), (16, 16));
//! session.close();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod brush;
pub mod config;
pub mod curve_editor;
mod error;
pub mod events;
pub mod session;

pub use brush::{BrushColor, BrushMode, BrushPhase, BrushTool, ViewTransform};
pub use config::{BrushDefaults, EditorConfig, Preset};
pub use curve_editor::{CurveCanvas, CurveEditor, DragState, PointerEvent};
pub use error::{EditorError, EditorResult};
pub use events::{EditorEvent, Generation};
pub use session::EditorSession;
