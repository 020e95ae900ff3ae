//! Params command: lists every adjustment with its range.

use anyhow::Result;
use darkroom_ops::Param;

pub fn run() -> Result<()> {
    println!("{:<24} {:>8} {:>8} {:>8}", "NAME", "MIN", "MAX", "DEFAULT");
    for param in Param::ALL {
        let r = param.range();
        println!("{:<24} {:>8} {:>8} {:>8}", param.name(), r.min, r.max, r.default);
    }
    Ok(())
}
