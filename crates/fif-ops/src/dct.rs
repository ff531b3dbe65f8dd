//! Unnormalized real-to-real cosine transforms on top of `rustfft`.
//!
//! Two 1D kernels, both length `n`:
//!
//! ```text
//! DCT-II  (forward):  Y[k] = 2 * sum_j x[j] * cos(pi * (j + 1/2) * k / n)
//! DCT-III (inverse):  y[j] = c[0] + 2 * sum_{k>=1} c[k] * cos(pi * k * (j + 1/2) / n)
//! ```
//!
//! Neither is normalized: `DCT-III(DCT-II(x)) = 2n * x`. Applied along both
//! axes of a `width x height` plane the round trip scales by
//! `4 * width * height`, which the filter pipeline undoes itself.
//!
//! Both directions run as one complex FFT of length `n` (even/odd sample
//! reordering plus a quarter-sample twiddle), so any length works, not just
//! powers of two.

use crate::buffer::alloc_zeroed;
use crate::OpsResult;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner, FftPlannerScalar};
use std::f64::consts::PI;
use std::sync::Arc;

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Spatial to frequency (DCT-II).
    Forward,
    /// Frequency to spatial (DCT-III).
    Inverse,
}

/// FFT planner family a kernel is built from.
///
/// `Auto` lets rustfft pick SIMD code paths for the running CPU; `Scalar`
/// forces the portable implementation. Self-optimizing plans time both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlannerKind {
    /// `FftPlanner`, runtime CPU feature detection.
    Auto,
    /// `FftPlannerScalar`, no SIMD.
    Scalar,
}

impl PlannerKind {
    /// Every candidate, in preference order.
    pub const ALL: [PlannerKind; 2] = [PlannerKind::Auto, PlannerKind::Scalar];

    fn plan(self, len: usize, direction: Direction) -> Arc<dyn Fft<f64>> {
        match (self, direction) {
            (PlannerKind::Auto, Direction::Forward) => FftPlanner::<f64>::new().plan_fft_forward(len),
            (PlannerKind::Auto, Direction::Inverse) => FftPlanner::<f64>::new().plan_fft_inverse(len),
            (PlannerKind::Scalar, Direction::Forward) => {
                FftPlannerScalar::<f64>::new().plan_fft_forward(len)
            }
            (PlannerKind::Scalar, Direction::Inverse) => {
                FftPlannerScalar::<f64>::new().plan_fft_inverse(len)
            }
        }
    }
}

/// 1D cosine transform of a fixed length.
///
/// Owns its FFT, twiddles and scratch, so `process` needs `&mut self` and
/// a kernel is never shared between threads.
pub struct DctKernel {
    len: usize,
    direction: Direction,
    fft: Arc<dyn Fft<f64>>,
    twiddles: Vec<Complex<f64>>,
    work: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl DctKernel {
    /// Builds a kernel of length `len`.
    pub fn new(len: usize, direction: Direction, planner: PlannerKind) -> OpsResult<Self> {
        let fft = planner.plan(len, direction);
        // exp(-i*pi*k/2n) forward, exp(+i*pi*k/2n) inverse
        let sign = match direction {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        };
        let twiddles = (0..len)
            .map(|k| Complex::from_polar(1.0, sign * PI * k as f64 / (2 * len) as f64))
            .collect();
        let scratch = alloc_zeroed(fft.get_inplace_scratch_len())?;
        Ok(Self {
            len,
            direction,
            fft,
            twiddles,
            work: alloc_zeroed(len)?,
            scratch,
        })
    }

    /// Transform direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Transforms `data` in place. `data.len()` must equal the kernel length.
    pub fn process(&mut self, data: &mut [f64]) {
        debug_assert_eq!(data.len(), self.len);
        match self.direction {
            Direction::Forward => self.forward(data),
            Direction::Inverse => self.inverse(data),
        }
    }

    fn forward(&mut self, data: &mut [f64]) {
        let n = self.len;
        // v = [x0, x2, x4, ..., x5, x3, x1]
        for k in 0..n.div_ceil(2) {
            self.work[k] = Complex::new(data[2 * k], 0.0);
        }
        for k in 0..n / 2 {
            self.work[n - 1 - k] = Complex::new(data[2 * k + 1], 0.0);
        }
        self.fft.process_with_scratch(&mut self.work, &mut self.scratch);
        for (k, out) in data.iter_mut().enumerate() {
            *out = 2.0 * (self.work[k] * self.twiddles[k]).re;
        }
    }

    fn inverse(&mut self, data: &mut [f64]) {
        let n = self.len;
        for k in 0..n {
            let mirrored = if k == 0 { 0.0 } else { data[n - k] };
            self.work[k] = Complex::new(data[k], -mirrored) * self.twiddles[k];
        }
        self.fft.process_with_scratch(&mut self.work, &mut self.scratch);
        for m in 0..n.div_ceil(2) {
            data[2 * m] = self.work[m].re;
        }
        for m in 0..n / 2 {
            data[2 * m + 1] = self.work[n - 1 - m].re;
        }
    }
}

impl std::fmt::Debug for DctKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DctKernel")
            .field("len", &self.len)
            .field("direction", &self.direction)
            .finish()
    }
}
