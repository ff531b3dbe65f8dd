//! # fif-core
//!
//! Core types for frequency-domain filtering of RGB images.
//!
//! - [`Image`] - fixed-size interleaved RGB buffer of `f64` samples, the value
//!   the frequency filter rewrites in place
//! - [`RgbGrid`] - decoded 8-bit pixel grid
//! - [`PixelSource`] - read access to any decoded pixel grid
//! - [`Channel`] - red/green/blue channel identifiers
//! - [`Error`], [`Result`] - container errors
//!
//! ## Crate Structure
//!
//! ```text
//! fif-core (this crate)
//!    ^
//!    |
//!    +-- fif-ops (frequency filter pipeline, linearization)
//!    +-- fif-bench
//! ```
//!
//! ## Feature Flags
//!
//! - `image` - `RgbImageSource`, a checked [`PixelSource`] over
//!   `image::RgbImage`, and conversions to and from [`RgbGrid`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channel;
pub mod error;
pub mod grid;
pub mod image;

pub use channel::{clamp_rgb, sample_to_u8, Channel, CHANNELS};
pub use error::{try_filled, Error, Result};
pub use grid::{PixelSource, RgbGrid};
#[cfg(feature = "image")]
pub use grid::RgbImageSource;
#[cfg(feature = "image")]
pub use ::image::RgbImage;
pub use image::Image;
