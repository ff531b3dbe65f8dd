//! Linearization round trips across thread counts.

use fif_core::{PixelSource, RgbGrid};
use fif_ops::{delinearize, filter, linearize, to_image, IdentityModifier, OpsError};

fn pattern(w: u16, h: u16) -> RgbGrid {
    RgbGrid::from_fn(w, h, |x, y| {
        let i = y as u32 * w as u32 + x as u32;
        [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (255 - i % 256) as u8]
    })
    .unwrap()
}

#[test]
fn test_round_trip_identity() {
    let grid = pattern(7, 5);
    for threads in [1, 2, 5, 17] {
        let mut linear = vec![0.0; 7 * 5 * 3];
        linearize(&grid, &mut linear, 7, 5, threads).unwrap();
        let mut back = RgbGrid::new(7, 5).unwrap();
        delinearize(&linear, &mut back, 7, 5, threads).unwrap();
        assert_eq!(back, grid, "threads = {}", threads);
    }
}

#[test]
fn test_output_independent_of_thread_count() {
    // 39 pixels: not divisible by 2, 5 or 17
    let grid = pattern(13, 3);
    let mut reference = vec![0.0; 13 * 3 * 3];
    linearize(&grid, &mut reference, 13, 3, 1).unwrap();
    for threads in [2, 5, 17, 39] {
        let mut linear = vec![-1.0; 13 * 3 * 3];
        linearize(&grid, &mut linear, 13, 3, threads).unwrap();
        assert_eq!(linear, reference, "threads = {}", threads);
    }
}

#[test]
fn test_single_row_and_single_column() {
    for (w, h) in [(1, 9), (9, 1)] {
        let grid = pattern(w, h);
        let mut linear = vec![0.0; w as usize * h as usize * 3];
        linearize(&grid, &mut linear, w, h, 4).unwrap();
        for (i, px) in linear.chunks_exact(3).enumerate() {
            let (x, y) = ((i % w as usize) as u16, (i / w as usize) as u16);
            let rgb = grid.rgb(x, y);
            assert_eq!(px, &[rgb[0] as f64, rgb[1] as f64, rgb[2] as f64]);
        }
    }
}

#[test]
fn test_rejects_more_threads_than_pixels() {
    let grid = pattern(2, 2);
    let mut linear = vec![0.0; 12];
    assert!(matches!(
        linearize(&grid, &mut linear, 2, 2, 5),
        Err(OpsError::InvalidParameter(_))
    ));
    let mut back = RgbGrid::new(2, 2).unwrap();
    assert!(matches!(
        delinearize(&linear, &mut back, 2, 2, 5),
        Err(OpsError::InvalidParameter(_))
    ));
}

#[test]
fn test_grid_through_filter() {
    let grid = pattern(10, 6);
    let mut image = to_image(&grid, 3).unwrap();
    filter(&mut image, false, &IdentityModifier).unwrap();
    let mut out = RgbGrid::new(10, 6).unwrap();
    delinearize(image.data(), &mut out, 10, 6, 3).unwrap();
    for (a, b) in out.pixels().iter().zip(grid.pixels()) {
        for c in 0..3 {
            assert!((a[c] as i32 - b[c] as i32).abs() <= 1);
        }
    }
}


#[cfg(feature = "image")]
#[test]
fn test_oversized_rgb_image_rejected() {
    use fif_core::{RgbImage, RgbImageSource};
    use fif_ops::linearize_image;

    let wide = RgbImage::new(70_000, 1);
    let err = RgbImageSource::new(&wide).unwrap_err();
    assert!(err.is_dimension_error());
    let err: OpsError = err.into();
    assert!(err.to_string().contains("70000x1"));

    let grid = RgbGrid::from_fn(6, 4, |x, y| [x as u8, y as u8, 42]).unwrap();
    let small = RgbImage::from(&grid);
    let source = RgbImageSource::new(&small).unwrap();
    let image = to_image(&source, 3).unwrap();
    assert_eq!(image.dimensions(), (6, 4));
    let mut linear = vec![0.0; 6 * 4 * 3];
    linearize_image(&source, &mut linear).unwrap();
    assert_eq!(&linear[3 * 7..3 * 8], &[1.0, 1.0, 42.0]);
    assert_eq!(image.data(), linear.as_slice());
}
