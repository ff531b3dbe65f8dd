//! RGB channel identifiers and sample clamping.

use std::fmt;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 3;

/// One color channel of an interleaved RGB buffer.
///
/// The discriminant is the channel's offset inside a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Channel {
    /// Red (offset 0)
    Red = 0,
    /// Green (offset 1)
    Green = 1,
    /// Blue (offset 2)
    Blue = 2,
}

impl Channel {
    /// All channels in interleaving order.
    pub const ALL: [Channel; CHANNELS] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Returns the channel's offset inside a pixel.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the channel for an offset, or `None` if `index >= 3`.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Channel::Red),
            1 => Some(Channel::Green),
            2 => Some(Channel::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// Clamps an integer sample to the 8-bit range `[0, 255]`.
///
/// Min/max composition, no branches.
#[inline]
pub fn clamp_rgb(value: i32) -> i32 {
    value.min(255).max(0)
}

/// Converts a floating sample to an 8-bit component.
///
/// Truncates toward zero, then clamps with [`clamp_rgb`]. NaN maps to 0.
#[inline]
pub fn sample_to_u8(value: f64) -> u8 {
    clamp_rgb(value as i32) as u8
}
