//! Render command: one headless editing pass over an image.

use crate::RenderArgs;
use anyhow::{Context, Result, bail};
#[allow(unused_imports)]
use tracing::{debug, info, trace, warn};
use darkroom_editor::{BrushColor, BrushMode, EditorConfig, EditorEvent, EditorSession, Preset};
use darkroom_ops::parse_assignment;

pub fn run(args: RenderArgs, verbose: u8) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    if let Some(backend) = &args.backend {
        config.backend = backend.clone();
    }

    let image = super::load_image(&args.input)?;
    let (w, h) = image.dimensions();
    let mut session = EditorSession::open(&image, &config).context("Failed to initialize renderer")?;

    if verbose > 0 {
        println!("Rendering {} ({}x{}) on {}", args.input.display(), w, h, session.backend_name());
    }

    if let Some(path) = &args.preset {
        let preset = Preset::from_file(path)?;
        session.handle(EditorEvent::ApplyPreset(Box::new(preset)))?;
    }

    for assignment in &args.set {
        let (param, value) = parse_assignment(assignment)?;
        session.handle(EditorEvent::SetParam { param, value })?;
        let stored = session.adjustments().get(param);
        if stored != value {
            warn!(%param, requested = value, stored, "value out of range, clamped");
        }
    }

    for arg in &args.curves {
        let (channel, curve) = super::parse_curve(arg)?;
        debug!(%channel, points = curve.len(), "curve");
        session.handle(EditorEvent::SetCurve { channel, curve })?;
    }

    if let Some(pos) = &args.brush {
        apply_brush(&mut session, &args, super::parse_position(pos)?)?;
    } else if args.clone_source.is_some() {
        warn!("--clone-source given without --brush, ignored");
    }

    let output = session.export()?;
    super::save_image(&args.output, output)?;
    let stats = session.close();
    info!(draws = stats.draws, lut_uploads = stats.lut_uploads, "render complete");

    if verbose > 0 {
        println!("Wrote {}", args.output.display());
    }

    Ok(())
}

fn apply_brush(session: &mut EditorSession, args: &RenderArgs, at: [f32; 2]) -> Result<()> {
    let mode: BrushMode = args.brush_mode.parse()?;
    session.handle(EditorEvent::SetBrushMode(mode))?;
    if let Some(size) = args.brush_size {
        session.handle(EditorEvent::SetBrushSize(size))?;
    }
    if let Some(opacity) = args.brush_opacity {
        session.handle(EditorEvent::SetBrushOpacity(opacity))?;
    }
    if let Some(color) = &args.brush_color {
        let color: BrushColor = color.parse()?;
        session.handle(EditorEvent::SetBrushColor(color))?;
    }

    match (mode, &args.clone_source) {
        (BrushMode::Clone, Some(src)) => {
            let [sx, sy] = super::parse_position(src)?;
            session.handle(EditorEvent::BrushDown { x: sx, y: sy })?;
            session.handle(EditorEvent::BrushUp)?;
        }
        (BrushMode::Clone, None) => bail!("clone mode needs --clone-source x,y"),
        (_, Some(_)) => warn!(mode = %mode, "--clone-source only applies to clone mode"),
        (_, None) => {}
    }

    session.handle(EditorEvent::BrushDown { x: at[0], y: at[1] })?;
    session.handle(EditorEvent::BrushUp)?;
    debug!(x = at[0], y = at[1], mode = %mode, "brush dab");
    Ok(())
}
