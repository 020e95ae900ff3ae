//! # darkroom-ops
//!
//! Adjustment parameters and the per-pixel pipeline.
//!
//! This crate defines *what* a frame looks like: the eighteen slider
//! parameters ([`AdjustmentState`]), the sixteen ordered colour stages
//! ([`stages`]), the brush compositing stage ([`brush`]) and a CPU renderer
//! ([`render_frame`]) that runs all seventeen over a [`Bitmap`]. The GPU
//! backend in `darkroom-gpu` reproduces the same arithmetic in WGSL.
//!
//! # Stage order
//!
//! Order matters; the stages do not commute. Every stage clamps its output
//! to `[0, 1]` before the next one runs.
//!
//! ```text
//! sharpen -> denoise -> curves -> saturation -> brightness/contrast
//!   -> shadows/highlights -> whites/blacks -> gamma -> warmth -> tint
//!   -> hue -> luminance -> colour denoise -> vignette -> dehaze -> grain
//!   -> brush
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - row-parallel rendering via rayon
//!
//! [`Bitmap`]: darkroom_core::Bitmap

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod brush;
mod error;
pub mod grain;
pub mod params;
pub mod pipeline;
pub mod stages;

pub use brush::{BrushDab, DabMode};
pub use error::{OpsError, OpsResult};
pub use params::{parse_assignment, AdjustmentState, Param, ParamRange};
pub use pipeline::{render_frame, shade_pixel, FrameUniforms};
