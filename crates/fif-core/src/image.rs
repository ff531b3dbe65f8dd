//! Interleaved RGB sample buffer.
//!
//! [`Image`] is the value the frequency filter operates on: fixed dimensions
//! and `3 * width * height` `f64` samples.
//!
//! # Memory Layout
//!
//! Samples are stored in **row-major** order, top-to-bottom, with the three
//! channels interleaved per pixel:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//!         ...
//! ```
//!
//! # Usage
//!
//! ```rust
//! use fif_core::Image;
//!
//! let mut img = Image::new(4, 2).unwrap();
//! img.set_pixel(1, 1, [255.0, 128.0, 0.0]);
//! assert_eq!(img.pixel(1, 1), [255.0, 128.0, 0.0]);
//! assert_eq!(img.data().len(), 3 * 4 * 2);
//! ```
//!
//! The buffer is only reachable through slices, so callers can rewrite
//! samples in place but can never change its length.

use crate::channel::CHANNELS;
use crate::error::{try_filled, validate_dimensions};
use crate::{Error, Result};

/// Owned RGB image with `f64` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u16,
    height: u16,
    /// Interleaved samples, length `3 * width * height`
    data: Vec<f64>,
}

impl Image {
    /// Creates a zero-filled image.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if width or height is zero
    /// - [`Error::AllocationFailed`] if the buffer cannot be allocated
    pub fn new(width: u16, height: u16) -> Result<Self> {
        let pixels = validate_dimensions(width, height)?;
        let data = try_filled(pixels * CHANNELS, 0.0)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates an image from existing interleaved samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if `data.len() != 3 * width * height`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fif_core::Image;
    ///
    /// let img = Image::from_data(2, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(img.pixel(1, 0), [4.0, 5.0, 6.0]);
    /// assert!(Image::from_data(2, 1, vec![0.0; 5]).is_err());
    /// ```
    pub fn from_data(width: u16, height: u16, data: Vec<f64>) -> Result<Self> {
        let expected = validate_dimensions(width, height)? * CHANNELS;
        if data.len() != expected {
            return Err(Error::size_mismatch(expected, data.len()));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates an image where every pixel equals `pixel`.
    pub fn filled(width: u16, height: u16, pixel: [f64; CHANNELS]) -> Result<Self> {
        let mut img = Self::new(width, height)?;
        img.fill(pixel);
        Ok(img)
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Returns `width * height`.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the interleaved samples.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the interleaved samples for in-place mutation.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the image and returns its sample buffer.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u16, y: u16) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u16, y: u16) -> [f64; CHANNELS] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        [self.data[o], self.data[o + 1], self.data[o + 2]]
    }

    /// Returns the pixel at (x, y), or an error if out of bounds.
    pub fn get_pixel(&self, x: u16, y: u16) -> Result<[f64; CHANNELS]> {
        if x < self.width && y < self.height {
            Ok(self.pixel(x, y))
        } else {
            Err(Error::out_of_bounds(x, y, self.width, self.height))
        }
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u16, y: u16, pixel: [f64; CHANNELS]) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        self.data[o..o + CHANNELS].copy_from_slice(&pixel);
    }

    /// Fills the entire image with a pixel value.
    pub fn fill(&mut self, pixel: [f64; CHANNELS]) {
        for chunk in self.data.chunks_exact_mut(CHANNELS) {
            chunk.copy_from_slice(&pixel);
        }
    }

    /// Iterates over all pixels with their coordinates, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u16, u16, [f64; CHANNELS])> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_new() {
        let img = Image::new(5, 3).unwrap();
        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(img.pixel_count(), 15);
        assert_eq!(img.data().len(), 45);
        assert!(img.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_image_zero_dimension() {
        assert!(Image::new(0, 3).is_err());
        assert!(Image::new(3, 0).is_err());
        assert!(Image::from_data(0, 0, Vec::new()).is_err());
    }

    #[test]
    fn test_image_layout_is_row_major_interleaved() {
        let mut img = Image::new(3, 2).unwrap();
        img.set_pixel(2, 1, [7.0, 8.0, 9.0]);
        // pixel index 1 * 3 + 2 = 5
        assert_eq!(&img.data()[15..18], &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_image_get_pixel_bounds() {
        let img = Image::filled(2, 2, [1.0, 2.0, 3.0]).unwrap();
        assert_eq!(img.get_pixel(1, 1).unwrap(), [1.0, 2.0, 3.0]);
        assert!(img.get_pixel(2, 0).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_image_pixels_order() {
        let data: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let img = Image::from_data(2, 2, data).unwrap();
        let coords: Vec<(u16, u16)> = img.pixels().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        let (_, _, last) = img.pixels().last().unwrap();
        assert_eq!(last, [9.0, 10.0, 11.0]);
    }
}
