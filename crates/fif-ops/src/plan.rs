//! 2D transform plans.
//!
//! A [`TransformPlan`] is bound to one direction and one `width x height`
//! plane. It owns a row kernel (length `width`), a column kernel (length
//! `height`) and a column gather buffer, so executing it allocates nothing.
//!
//! # Frequency layout
//!
//! Coefficients are stored row-major like the image: index `v * width + u`
//! holds horizontal frequency `u` and vertical frequency `v`. The DC term is
//! at index 0.
//!
//! # Plan quality
//!
//! [`PlanQuality::Estimate`] builds kernels straight from rustfft's default
//! planner. [`PlanQuality::Measure`] builds one candidate per
//! [`PlannerKind`], times each on the buffers it is bound to and keeps the
//! fastest. Measuring runs real transforms into the destination buffer, so
//! plans must be built before the buffers receive real pixel data.

use crate::dct::{DctKernel, Direction, PlannerKind};
use crate::error::ensure_len;
use crate::{OpsError, OpsResult};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Timed executions per candidate when measuring.
const MEASURE_ROUNDS: usize = 3;

/// How much effort plan construction may spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlanQuality {
    /// Cheap heuristic: default planner, no timing.
    #[default]
    Estimate,
    /// Self-optimizing: time every planner family on the bound buffers.
    Measure,
}

/// Forward or inverse 2D cosine transform over one plane.
#[derive(Debug)]
pub struct TransformPlan {
    direction: Direction,
    width: usize,
    height: usize,
    planner: PlannerKind,
    rows: DctKernel,
    cols: DctKernel,
    column: Vec<f64>,
}

impl TransformPlan {
    /// Builds a plan for `src -> dst` with `width * height` samples each.
    ///
    /// With [`PlanQuality::Measure`] the destination buffer is overwritten.
    pub fn new(
        direction: Direction,
        width: usize,
        height: usize,
        quality: PlanQuality,
        src: &[f64],
        dst: &mut [f64],
    ) -> OpsResult<Self> {
        trace!(?direction, width, height, ?quality, "TransformPlan::new");
        if width == 0 || height == 0 {
            return Err(OpsError::InvalidDimensions(format!(
                "cannot plan a {width}x{height} transform"
            )));
        }
        ensure_len("plan source", src.len(), width * height)?;
        ensure_len("plan destination", dst.len(), width * height)?;

        match quality {
            PlanQuality::Estimate => Self::build(direction, width, height, PlannerKind::Auto),
            PlanQuality::Measure => Self::measure(direction, width, height, src, dst),
        }
    }

    fn build(
        direction: Direction,
        width: usize,
        height: usize,
        planner: PlannerKind,
    ) -> OpsResult<Self> {
        Ok(Self {
            direction,
            width,
            height,
            planner,
            rows: DctKernel::new(width, direction, planner)?,
            cols: DctKernel::new(height, direction, planner)?,
            column: crate::buffer::alloc_zeroed(height)?,
        })
    }

    fn measure(
        direction: Direction,
        width: usize,
        height: usize,
        src: &[f64],
        dst: &mut [f64],
    ) -> OpsResult<Self> {
        let mut best: Option<(Duration, Self)> = None;
        for planner in PlannerKind::ALL {
            let mut candidate = Self::build(direction, width, height, planner)?;
            let mut fastest = Duration::MAX;
            for _ in 0..MEASURE_ROUNDS {
                let start = Instant::now();
                candidate.execute(src, dst)?;
                fastest = fastest.min(start.elapsed());
            }
            debug!(?direction, width, height, ?planner, ?fastest, "measured planner");
            if best.as_ref().is_none_or(|(t, _)| fastest < *t) {
                best = Some((fastest, candidate));
            }
        }
        best.map(|(_, plan)| plan)
            .ok_or_else(|| OpsError::Plan("no planner candidates".into()))
    }

    /// Transform direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Planner family the kernels were built from.
    #[inline]
    pub fn planner(&self) -> PlannerKind {
        self.planner
    }

    /// Plane dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Transforms `src` into `dst`. `src` is left untouched.
    ///
    /// Forward runs rows then columns, inverse runs columns then rows.
    pub fn execute(&mut self, src: &[f64], dst: &mut [f64]) -> OpsResult<()> {
        let len = self.width * self.height;
        ensure_len("transform source", src.len(), len)?;
        ensure_len("transform destination", dst.len(), len)?;

        dst.copy_from_slice(src);
        match self.direction {
            Direction::Forward => {
                self.transform_rows(dst);
                self.transform_columns(dst);
            }
            Direction::Inverse => {
                self.transform_columns(dst);
                self.transform_rows(dst);
            }
        }
        Ok(())
    }

    fn transform_rows(&mut self, plane: &mut [f64]) {
        for row in plane.chunks_exact_mut(self.width) {
            self.rows.process(row);
        }
    }

    fn transform_columns(&mut self, plane: &mut [f64]) {
        let w = self.width;
        for x in 0..w {
            for (y, v) in self.column.iter_mut().enumerate() {
                *v = plane[y * w + x];
            }
            self.cols.process(&mut self.column);
            for (y, v) in self.column.iter().enumerate() {
                plane[y * w + x] = *v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn plans(w: usize, h: usize, quality: PlanQuality) -> (TransformPlan, TransformPlan) {
        let mut a = vec![0.0; w * h];
        let mut b = vec![0.0; w * h];
        let fwd = TransformPlan::new(Direction::Forward, w, h, quality, &a, &mut b).unwrap();
        let inv = TransformPlan::new(Direction::Inverse, w, h, quality, &b, &mut a).unwrap();
        (fwd, inv)
    }

    #[test]
    fn test_roundtrip_scale_is_4wh() {
        for (w, h) in [(1, 1), (2, 2), (3, 5), (8, 4), (7, 9)] {
            let (mut fwd, mut inv) = plans(w, h, PlanQuality::Estimate);
            let src: Vec<f64> = (0..w * h).map(|i| (i * 31 % 17) as f64).collect();
            let mut freq = vec![0.0; w * h];
            let mut back = vec![0.0; w * h];
            fwd.execute(&src, &mut freq).unwrap();
            inv.execute(&freq, &mut back).unwrap();
            let scale = 4.0 * (w * h) as f64;
            for (a, b) in back.iter().zip(&src) {
                assert_abs_diff_eq!(*a, scale * b, epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_dc_coefficient_of_constant_plane() {
        let (w, h) = (4, 3);
        let (mut fwd, _) = plans(w, h, PlanQuality::Estimate);
        let src = vec![10.0; w * h];
        let mut freq = vec![0.0; w * h];
        fwd.execute(&src, &mut freq).unwrap();
        assert_abs_diff_eq!(freq[0], 4.0 * (w * h) as f64 * 10.0, epsilon = 1e-9);
        for v in &freq[1..] {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_horizontal_frequency_layout() {
        // cos along x only: energy stays in row v = 0
        let (w, h) = (8, 4);
        let (mut fwd, _) = plans(w, h, PlanQuality::Estimate);
        let src: Vec<f64> = (0..w * h)
            .map(|i| {
                let x = (i % w) as f64;
                (std::f64::consts::PI * (x + 0.5) * 2.0 / w as f64).cos()
            })
            .collect();
        let mut freq = vec![0.0; w * h];
        fwd.execute(&src, &mut freq).unwrap();
        for (i, v) in freq.iter().enumerate() {
            if i == 2 {
                assert!(v.abs() > 1.0);
            } else {
                assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_measure_builds_working_plan() {
        let (w, h) = (6, 5);
        let (mut fwd, mut inv) = plans(w, h, PlanQuality::Measure);
        assert!(PlannerKind::ALL.contains(&fwd.planner()));
        let src: Vec<f64> = (0..w * h).map(|i| i as f64).collect();
        let mut freq = vec![0.0; w * h];
        let mut back = vec![0.0; w * h];
        fwd.execute(&src, &mut freq).unwrap();
        inv.execute(&freq, &mut back).unwrap();
        for (a, b) in back.iter().zip(&src) {
            assert_abs_diff_eq!(*a * 0.25 / (w * h) as f64, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_plans_rejected() {
        let a = vec![0.0; 4];
        let mut b = vec![0.0; 3];
        assert!(TransformPlan::new(Direction::Forward, 0, 4, PlanQuality::Estimate, &a, &mut b).is_err());
        assert!(matches!(
            TransformPlan::new(Direction::Forward, 2, 2, PlanQuality::Estimate, &a, &mut b),
            Err(OpsError::SizeMismatch(_))
        ));
    }
}
