//! Decoded 8-bit pixel grids.
//!
//! A codec hands the filter a 2D grid of pixels with integer red, green and
//! blue components. The linearization layer only needs to read such a grid
//! through [`PixelSource`] and to write into an [`RgbGrid`].
//!
//! With the `image` feature enabled, an `image::RgbImage` is read through
//! `RgbImageSource`, which checks that both dimensions fit in 16 bits, and
//! converts to and from [`RgbGrid`].

use crate::channel::CHANNELS;
use crate::error::{try_filled, validate_dimensions};
use crate::{Error, Result};

/// Read access to a 2D grid of RGB pixels.
///
/// Implementations must be cheap to query per pixel; linearization calls
/// [`rgb`](Self::rgb) once for every pixel, possibly from several threads.
pub trait PixelSource {
    /// Returns (width, height) in pixels.
    fn dimensions(&self) -> (u16, u16);

    /// Returns the components of the pixel at (x, y).
    ///
    /// Callers guarantee `x < width` and `y < height`.
    fn rgb(&self, x: u16, y: u16) -> [u8; CHANNELS];
}

/// Owned grid of 8-bit RGB pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbGrid {
    width: u16,
    height: u16,
    pixels: Vec<[u8; CHANNELS]>,
}

impl RgbGrid {
    /// Creates a black grid.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        let count = validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: try_filled(count, [0; CHANNELS])?,
        })
    }

    /// Creates a grid from row-major pixels.
    pub fn from_pixels(width: u16, height: u16, pixels: Vec<[u8; CHANNELS]>) -> Result<Self> {
        let count = validate_dimensions(width, height)?;
        if pixels.len() != count {
            return Err(Error::size_mismatch(count, pixels.len()));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a grid by evaluating `f(x, y)` for every pixel.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fif_core::{PixelSource, RgbGrid};
    ///
    /// let grid = RgbGrid::from_fn(4, 4, |x, y| [x as u8, y as u8, 0]).unwrap();
    /// assert_eq!(grid.rgb(3, 1), [3, 1, 0]);
    /// ```
    pub fn from_fn<F>(width: u16, height: u16, mut f: F) -> Result<Self>
    where
        F: FnMut(u16, u16) -> [u8; CHANNELS],
    {
        let mut grid = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                grid.set_pixel(x, y, f(x, y));
            }
        }
        Ok(grid)
    }

    /// Returns the grid width.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Returns the grid height.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns `width * height`.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Returns all pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[[u8; CHANNELS]] {
        &self.pixels
    }

    /// Returns all pixels for in-place mutation.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [[u8; CHANNELS]] {
        &mut self.pixels
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u16, y: u16) -> [u8; CHANNELS] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u16, y: u16, rgb: [u8; CHANNELS]) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize] = rgb;
    }
}

impl PixelSource for RgbGrid {
    #[inline]
    fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    #[inline]
    fn rgb(&self, x: u16, y: u16) -> [u8; CHANNELS] {
        self.pixel(x, y)
    }
}

#[cfg(feature = "image")]
mod image_adaptor {
    use super::*;
    use ::image::{Rgb, RgbImage};

    fn narrow(width: u32, height: u32) -> Result<(u16, u16)> {
        match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => Ok((w, h)),
            _ => Err(Error::invalid_dimensions(
                width,
                height,
                "dimensions must fit in 16 bits",
            )),
        }
    }

    /// [`PixelSource`] view of an `image::RgbImage` whose dimensions fit in
    /// 16 bits.
    #[derive(Debug, Clone, Copy)]
    pub struct RgbImageSource<'a> {
        image: &'a RgbImage,
        width: u16,
        height: u16,
    }

    impl<'a> RgbImageSource<'a> {
        /// Wraps `image`.
        ///
        /// # Errors
        ///
        /// [`Error::InvalidDimensions`] if a dimension is zero or exceeds
        /// `u16::MAX`.
        pub fn new(image: &'a RgbImage) -> Result<Self> {
            let (width, height) = narrow(image.width(), image.height())?;
            validate_dimensions(width, height)?;
            Ok(Self {
                image,
                width,
                height,
            })
        }

        /// Returns the wrapped image.
        #[inline]
        pub fn image(&self) -> &'a RgbImage {
            self.image
        }
    }

    impl<'a> TryFrom<&'a RgbImage> for RgbImageSource<'a> {
        type Error = Error;

        fn try_from(image: &'a RgbImage) -> Result<Self> {
            Self::new(image)
        }
    }

    impl PixelSource for RgbImageSource<'_> {
        #[inline]
        fn dimensions(&self) -> (u16, u16) {
            (self.width, self.height)
        }

        #[inline]
        fn rgb(&self, x: u16, y: u16) -> [u8; CHANNELS] {
            self.image.get_pixel(x as u32, y as u32).0
        }
    }

    impl TryFrom<&RgbImage> for RgbGrid {
        type Error = Error;

        fn try_from(img: &RgbImage) -> Result<Self> {
            let (w, h) = narrow(img.width(), img.height())?;
            let pixels = img.pixels().map(|p| p.0).collect();
            RgbGrid::from_pixels(w, h, pixels)
        }
    }

    impl From<&RgbGrid> for RgbImage {
        fn from(grid: &RgbGrid) -> Self {
            RgbImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
                Rgb(grid.pixel(x as u16, y as u16))
            })
        }
    }

}

#[cfg(feature = "image")]
pub use image_adaptor::RgbImageSource;
