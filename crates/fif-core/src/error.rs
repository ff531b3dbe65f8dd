//! Error types for fif-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of the core containers:
//! - Dimension validation when building an [`Image`](crate::Image) or
//!   [`RgbGrid`](crate::RgbGrid)
//! - Buffer length mismatches when wrapping existing sample data
//! - Bounds checking on pixel access
//! - Allocation failures for very large buffers
//!
//! # Usage
//!
//! ```rust
//! use fif_core::{Error, Result};
//!
//! fn check(x: u16, y: u16, width: u16, height: u16) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the core image containers.
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u16,
        /// Y coordinate that was out of bounds
        y: u16,
        /// Image width
        width: u16,
        /// Image height
        height: u16,
    },

    /// Invalid image dimensions.
    ///
    /// Returned when width or height is zero, or when dimensions coming from
    /// a foreign container do not fit in 16 bits.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Supplied buffer length does not match the dimensions.
    #[error("buffer size mismatch: expected {expected} elements, got {got}")]
    SizeMismatch {
        /// Element count implied by the dimensions
        expected: usize,
        /// Element count actually supplied
        got: usize,
    },

    /// Memory allocation failed.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::SizeMismatch`] error.
    #[inline]
    pub fn size_mismatch(expected: usize, got: usize) -> Self {
        Self::SizeMismatch { expected, got }
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this is a dimension or size error.
    #[inline]
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, Self::InvalidDimensions { .. } | Self::SizeMismatch { .. })
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}

/// Validates a width/height pair for a three-channel buffer.
///
/// Returns the pixel count on success.
pub(crate) fn validate_dimensions(width: u16, height: u16) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width as u32,
            height as u32,
            "width and height must be > 0",
        ));
    }
    Ok(width as usize * height as usize)
}

/// Allocates a buffer of `len` copies of `value`, reporting exhaustion as an error.
pub fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        Error::allocation_failed(len.saturating_mul(std::mem::size_of::<T>()), e.to_string())
    })?;
    buf.resize(len, value);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("80x60"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = validate_dimensions(0, 10).unwrap_err();
        assert!(err.is_dimension_error());
        assert!(err.to_string().contains("0x10"));
        assert_eq!(validate_dimensions(3, 4).unwrap(), 12);
    }

    #[test]
    fn test_allocation_failure_reported() {
        let err = try_filled(usize::MAX, 0u8).unwrap_err();
        assert!(err.is_allocation_error());
    }

    #[test]
    fn test_size_mismatch() {
        let err = Error::size_mismatch(12, 9);
        assert!(err.to_string().contains("expected 12"));
        assert!(err.is_dimension_error());
    }
}
