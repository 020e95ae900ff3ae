//! darkroom - non-destructive image adjustment from the command line
//!
//! Drives an editor session headlessly: decodes an image, applies slider
//! values, curves and brush dabs, and writes the exported frame.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "darkroom")]
#[command(author, version, about = "Non-destructive image adjustment engine")]
#[command(long_about = "
Applies the 17-stage adjustment pipeline (tone, colour, curves, retouch brush)
to an image and writes the result.

Examples:
  darkroom render in.png -o out.png --set exposure=0.3 --set hue=45
  darkroom render in.png -o out.png --curve combined=0:1,1:0
  darkroom render in.png -o out.png --preset look.yaml --backend cpu
  darkroom render in.png -o out.png --brush 120,80 --brush-mode clone --clone-source 40,80
  darkroom lut --points 0:0,0.5:0.7,1:1 --resolution 16
  darkroom params
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an image through the adjustment pipeline
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// Print the LUT generated from control points
    Lut(LutArgs),

    /// List adjustment parameters with their ranges
    #[command(visible_alias = "p")]
    Params,
}

#[derive(Args)]
struct RenderArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Session config (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Adjustment preset (YAML)
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Set a parameter, e.g. `--set contrast=1.2` (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Replace a channel curve, e.g. `--curve red=0:0,0.5:0.6,1:1` (repeatable)
    #[arg(long = "curve", value_name = "CHANNEL=X:Y,...")]
    curves: Vec<String>,

    /// Apply one brush dab at image position `x,y`
    #[arg(long, value_name = "X,Y")]
    brush: Option<String>,

    /// Brush mode: paint, clone or heal
    #[arg(long, default_value = "paint")]
    brush_mode: String,

    /// Brush radius in pixels
    #[arg(long)]
    brush_size: Option<f32>,

    /// Brush opacity (0-1)
    #[arg(long)]
    brush_opacity: Option<f32>,

    /// Paint colour: white or black
    #[arg(long)]
    brush_color: Option<String>,

    /// Clone source position `x,y` (required for clone mode)
    #[arg(long, value_name = "X,Y")]
    clone_source: Option<String>,

    /// Backend: auto, cpu or wgpu (overrides config)
    #[arg(short, long)]
    backend: Option<String>,
}

#[derive(Args)]
struct LutArgs {
    /// Control points `x:y,x:y,...` (empty for identity)
    #[arg(short, long, default_value = "")]
    points: String,

    /// Number of LUT entries
    #[arg(short, long, default_value = "256")]
    resolution: usize,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Render(args) => commands::render::run(args, cli.verbose),
        Commands::Lut(args) => commands::lut::run(args),
        Commands::Params => commands::params::run(),
    }
}
