//! Curve channel tag.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// Number of curve channels.
pub const NUM_CHANNELS: usize = 4;

/// Tone-curve channel.
///
/// The discriminants double as indices into per-channel arrays
/// (curves, LUTs, GPU LUT textures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(usize)]
pub enum Channel {
    /// Combined (RGB) curve, applied after the per-channel curves.
    #[default]
    Combined = 0,
    /// Red channel curve.
    Red = 1,
    /// Green channel curve.
    Green = 2,
    /// Blue channel curve.
    Blue = 3,
}

impl Channel {
    /// All channels, in index order.
    pub const ALL: [Channel; NUM_CHANNELS] = [Self::Combined, Self::Red, Self::Green, Self::Blue];

    /// Index into per-channel arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name, as used in presets and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" | "rgb" | "master" => Ok(Self::Combined),
            "red" | "r" => Ok(Self::Red),
            "green" | "g" => Ok(Self::Green),
            "blue" | "b" => Ok(Self::Blue),
            other => Err(Error::UnknownChannel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order() {
        for (i, ch) in Channel::ALL.iter().enumerate() {
            assert_eq!(ch.index(), i);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("RGB".parse::<Channel>().unwrap(), Channel::Combined);
        assert_eq!("g".parse::<Channel>().unwrap(), Channel::Green);
        assert!("alpha".parse::<Channel>().is_err());
    }
}
