//! LUT command: prints the table generated from control points.

use crate::LutArgs;
use anyhow::{Result, bail};
use darkroom_lut::{extend_points, generate_lut};

pub fn run(args: LutArgs) -> Result<()> {
    if args.resolution < 2 {
        bail!("Resolution must be at least 2, got {}", args.resolution);
    }
    let points = super::parse_points(&args.points)?;

    let ext = extend_points(&points);
    if !ext.is_empty() {
        let pts: Vec<String> = ext.iter().map(|p| format!("({}, {})", p.x, p.y)).collect();
        println!("# points: {}", pts.join(" "));
    }

    let last = (args.resolution - 1) as f32;
    for (i, v) in generate_lut(&points, args.resolution).iter().enumerate() {
        println!("{:.6}\t{:.6}", i as f32 / last, v);
    }
    Ok(())
}
