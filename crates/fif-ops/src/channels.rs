//! Channel splitting and recombination.
//!
//! - [`split`] deinterleaves `R G B R G B ...` into three planar buffers,
//!   lossless.
//! - [`combine`] reinterleaves three planar buffers, truncating every sample
//!   to an integer and clamping it to `[0, 255]`.
//!
//! `combine` after `split` reproduces the input exactly when every sample is
//! already an integer inside `[0, 255]`.
//!
//! # Example
//!
//! ```rust
//! use fif_ops::channels::{combine, split};
//!
//! let mut image = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
//! let (mut r, mut g, mut b) = (vec![0.0; 2], vec![0.0; 2], vec![0.0; 2]);
//! split(&image, 2, &mut r, &mut g, &mut b).unwrap();
//! assert_eq!(r, vec![10.0, 40.0]);
//!
//! r[0] = 300.7;
//! g[1] = -4.0;
//! combine(&mut image, 2, &r, &g, &b).unwrap();
//! assert_eq!(image, vec![255.0, 20.0, 30.0, 40.0, 0.0, 60.0]);
//! ```

use crate::error::ensure_len;
use crate::OpsResult;
use fif_core::{clamp_rgb, CHANNELS};
use tracing::trace;

/// Deinterleaves `length` RGB pixels into three channel buffers.
///
/// # Errors
///
/// [`OpsError::SizeMismatch`](crate::OpsError::SizeMismatch) if `image` does
/// not hold `3 * length` samples or a channel buffer does not hold `length`.
pub fn split(
    image: &[f64],
    length: usize,
    red: &mut [f64],
    green: &mut [f64],
    blue: &mut [f64],
) -> OpsResult<()> {
    trace!(length, "channels::split");
    ensure_len("interleaved image", image.len(), length * CHANNELS)?;
    ensure_len("red channel", red.len(), length)?;
    ensure_len("green channel", green.len(), length)?;
    ensure_len("blue channel", blue.len(), length)?;

    for (i, px) in image.chunks_exact(CHANNELS).enumerate() {
        red[i] = px[0];
        green[i] = px[1];
        blue[i] = px[2];
    }
    Ok(())
}

/// Reinterleaves three channel buffers into `image`, clamping to `[0, 255]`.
///
/// Each sample is truncated toward zero before clamping, so `254.9` becomes
/// `254` and `-0.9` becomes `0`.
pub fn combine(
    image: &mut [f64],
    length: usize,
    red: &[f64],
    green: &[f64],
    blue: &[f64],
) -> OpsResult<()> {
    trace!(length, "channels::combine");
    ensure_len("interleaved image", image.len(), length * CHANNELS)?;
    ensure_len("red channel", red.len(), length)?;
    ensure_len("green channel", green.len(), length)?;
    ensure_len("blue channel", blue.len(), length)?;

    for (i, px) in image.chunks_exact_mut(CHANNELS).enumerate() {
        px[0] = clamp_sample(red[i]);
        px[1] = clamp_sample(green[i]);
        px[2] = clamp_sample(blue[i]);
    }
    Ok(())
}

#[inline]
fn clamp_sample(v: f64) -> f64 {
    clamp_rgb(v as i32) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_order() {
        let image: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let mut r = vec![0.0; 4];
        let mut g = vec![0.0; 4];
        let mut b = vec![0.0; 4];
        split(&image, 4, &mut r, &mut g, &mut b).unwrap();
        assert_eq!(r, vec![0.0, 3.0, 6.0, 9.0]);
        assert_eq!(g, vec![1.0, 4.0, 7.0, 10.0]);
        assert_eq!(b, vec![2.0, 5.0, 8.0, 11.0]);
    }

    #[test]
    fn test_split_is_lossless() {
        let image = vec![-3.25, 1e9, 0.125];
        let mut r = vec![0.0];
        let mut g = vec![0.0];
        let mut b = vec![0.0];
        split(&image, 1, &mut r, &mut g, &mut b).unwrap();
        assert_eq!((r[0], g[0], b[0]), (-3.25, 1e9, 0.125));
    }

    #[test]
    fn test_combine_clamps_bounds() {
        let mut image = vec![0.0; 9];
        let r = [-1.0, 255.0, 1000.0];
        let g = [-0.99, 255.99, 256.0];
        let b = [f64::NEG_INFINITY, 128.5, f64::INFINITY];
        combine(&mut image, 3, &r, &g, &b).unwrap();
        assert_eq!(image, vec![0.0, 0.0, 0.0, 255.0, 255.0, 128.0, 255.0, 255.0, 255.0]);
    }

    #[test]
    fn test_combine_split_identity_in_range() {
        let original: Vec<f64> = (0..30).map(|v| ((v * 37) % 256) as f64).collect();
        let mut r = vec![0.0; 10];
        let mut g = vec![0.0; 10];
        let mut b = vec![0.0; 10];
        split(&original, 10, &mut r, &mut g, &mut b).unwrap();
        let mut out = vec![0.0; 30];
        combine(&mut out, 10, &r, &g, &b).unwrap();
        assert_eq!(out, original);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let image = vec![0.0; 9];
        let mut r = vec![0.0; 3];
        let mut g = vec![0.0; 2];
        let mut b = vec![0.0; 3];
        assert!(split(&image, 3, &mut r, &mut g, &mut b).is_err());
        assert!(split(&image, 4, &mut r, &mut g, &mut b).is_err());
    }
}
