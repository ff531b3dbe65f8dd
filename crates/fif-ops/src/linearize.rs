//! Pixel linearization.
//!
//! Converts between a 2D pixel grid and a flat `R G B R G B ...` buffer of
//! `3 * width * height` samples in row-major order.
//!
//! With `thread_count > 1` the work is split by [`PixelPartition`]: every
//! chunk covers whole pixels, so a pixel's three samples are never written
//! by two workers. Each worker derives its starting `(x, y)` from its chunk
//! offset and walks forward, wrapping at the end of every row. The output
//! does not depend on `thread_count`.
//!
//! # Example
//!
//! ```rust
//! use fif_core::RgbGrid;
//! use fif_ops::linearize::{delinearize, linearize};
//!
//! let grid = RgbGrid::from_fn(3, 2, |x, y| [x as u8, y as u8, 7]).unwrap();
//! let mut linear = vec![0.0; 3 * 3 * 2];
//! linearize(&grid, &mut linear, 3, 2, 2).unwrap();
//! assert_eq!(&linear[..6], &[0.0, 0.0, 7.0, 1.0, 0.0, 7.0]);
//!
//! let mut back = RgbGrid::new(3, 2).unwrap();
//! delinearize(&linear, &mut back, 3, 2, 4).unwrap();
//! assert_eq!(back, grid);
//! ```

use crate::error::ensure_len;
use crate::parallel::{PixelPartition, WorkerGroup};
use crate::{OpsError, OpsResult};
use fif_core::{sample_to_u8, Image, PixelSource, RgbGrid, CHANNELS};
use tracing::{debug, trace};

/// Writes `source` into `linear` as interleaved samples.
///
/// `thread_count` below one is treated as one. Chunks hold
/// `ceil(pixels / thread_count)` pixels, so the number of workers actually
/// started is [`PixelPartition::chunk_count`], which may be lower than
/// `thread_count` (39 pixels over 17 threads runs 13 workers).
///
/// # Errors
///
/// - [`OpsError::InvalidDimensions`] for a zero dimension
/// - [`OpsError::SizeMismatch`] if `source` is not `width x height` or
///   `linear` does not hold `3 * width * height` samples
/// - [`OpsError::InvalidParameter`] if `thread_count` exceeds the pixel count
pub fn linearize<S>(
    source: &S,
    linear: &mut [f64],
    width: u16,
    height: u16,
    thread_count: usize,
) -> OpsResult<()>
where
    S: PixelSource + Sync + ?Sized,
{
    trace!(width, height, thread_count, "linearize");
    check_dimensions("source grid", source.dimensions(), width, height)?;
    let partition = plan(width, height, linear.len(), thread_count)?;
    let w = width as usize;

    if partition.chunk_count() == 1 {
        read_pixels(source, linear, w, 0);
        return Ok(());
    }

    let group = WorkerGroup::new(partition.chunk_count())?;
    group.fan_out(
        linear.chunks_mut(partition.samples_per_chunk()),
        |index, chunk| read_pixels(source, chunk, w, partition.chunk_start(index)),
    )?;
    Ok(())
}

/// Single-threaded [`linearize`] taking the dimensions from `source`.
pub fn linearize_image<S>(source: &S, linear: &mut [f64]) -> OpsResult<()>
where
    S: PixelSource + Sync + ?Sized,
{
    let (width, height) = source.dimensions();
    linearize(source, linear, width, height, 1)
}

/// Linearizes `source` into a new [`Image`] ready for filtering.
pub fn to_image<S>(source: &S, thread_count: usize) -> OpsResult<Image>
where
    S: PixelSource + Sync + ?Sized,
{
    let (width, height) = source.dimensions();
    let mut image = Image::new(width, height)?;
    linearize(source, image.data_mut(), width, height, thread_count)?;
    Ok(image)
}

/// Writes interleaved samples from `linear` back into `grid`.
///
/// Samples are truncated toward zero and clamped to `[0, 255]`. Errors and
/// the worker count follow [`linearize`].
pub fn delinearize(
    linear: &[f64],
    grid: &mut RgbGrid,
    width: u16,
    height: u16,
    thread_count: usize,
) -> OpsResult<()> {
    trace!(width, height, thread_count, "delinearize");
    check_dimensions("target grid", (grid.width(), grid.height()), width, height)?;
    let partition = plan(width, height, linear.len(), thread_count)?;

    if partition.chunk_count() == 1 {
        write_pixels(linear, grid.pixels_mut());
        return Ok(());
    }

    let group = WorkerGroup::new(partition.chunk_count())?;
    let chunks = grid
        .pixels_mut()
        .chunks_mut(partition.pixels_per_chunk())
        .zip(linear.chunks(partition.samples_per_chunk()));
    group.fan_out(chunks, |_, (pixels, samples)| write_pixels(samples, pixels))?;
    Ok(())
}

fn check_dimensions(what: &str, actual: (u16, u16), width: u16, height: u16) -> OpsResult<()> {
    if width == 0 || height == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "cannot linearize a {width}x{height} image"
        )));
    }
    if actual != (width, height) {
        return Err(OpsError::SizeMismatch(format!(
            "{what} is {}x{}, expected {width}x{height}",
            actual.0, actual.1
        )));
    }
    Ok(())
}

fn plan(width: u16, height: u16, samples: usize, thread_count: usize) -> OpsResult<PixelPartition> {
    let pixels = width as usize * height as usize;
    ensure_len("linear buffer", samples, pixels * CHANNELS)?;
    let partition = PixelPartition::new(pixels, thread_count)?;
    debug!(
        pixels,
        threads = partition.threads(),
        chunks = partition.chunk_count(),
        pixels_per_chunk = partition.pixels_per_chunk(),
        "linearization partition"
    );
    Ok(partition)
}

/// Fills `chunk` starting at flat pixel index `start`.
fn read_pixels<S>(source: &S, chunk: &mut [f64], width: usize, start: usize)
where
    S: PixelSource + ?Sized,
{
    let mut x = start % width;
    let mut y = start / width;
    for px in chunk.chunks_exact_mut(CHANNELS) {
        let rgb = source.rgb(x as u16, y as u16);
        px[0] = rgb[0] as f64;
        px[1] = rgb[1] as f64;
        px[2] = rgb[2] as f64;
        x += 1;
        if x == width {
            x = 0;
            y += 1;
        }
    }
}

fn write_pixels(samples: &[f64], pixels: &mut [[u8; CHANNELS]]) {
    for (px, s) in pixels.iter_mut().zip(samples.chunks_exact(CHANNELS)) {
        *px = [sample_to_u8(s[0]), sample_to_u8(s[1]), sample_to_u8(s[2])];
    }
}
