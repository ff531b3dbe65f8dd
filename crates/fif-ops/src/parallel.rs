//! Bounded worker groups using Rayon.
//!
//! A [`WorkerGroup`] is a fixed-size thread pool with one operation,
//! [`fan_out`](WorkerGroup::fan_out): run one task per item and join them
//! all before returning. The frequency filter fans out one task per color
//! channel; linearization fans out one task per [`PixelPartition`] chunk.
//!
//! Tasks never share mutable state. Every item handed to a task is either
//! owned or a disjoint `&mut` slice, so no locking is needed beyond the
//! final join.
//!
//! # Example
//!
//! ```rust
//! use fif_ops::parallel::WorkerGroup;
//!
//! let group = WorkerGroup::new(2).unwrap();
//! let mut data = vec![1, 2, 3, 4, 5];
//! group
//!     .fan_out(data.chunks_mut(3), |_, chunk| chunk.iter_mut().for_each(|v| *v *= 10))
//!     .unwrap();
//! assert_eq!(data, vec![10, 20, 30, 40, 50]);
//! ```

use crate::{OpsError, OpsResult};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace};

/// Fixed-size task fan-out with a single join barrier.
pub struct WorkerGroup {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerGroup {
    /// Starts a group of `workers` threads. Zero is treated as one.
    pub fn new(workers: usize) -> OpsResult<Self> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("fif-worker-{i}"))
            .build()
            .map_err(|e| OpsError::WorkerPool(e.to_string()))?;
        debug!(workers, "worker group started");
        Ok(Self { pool, workers })
    }

    /// Number of threads in the group.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `task(index, item)` for every item and waits for all of them.
    ///
    /// Results come back in item order. Every task runs to completion even
    /// if another one panics; the first panic (by index) is then reported
    /// as [`OpsError::WorkerPanicked`].
    pub fn fan_out<I, T, R, F>(&self, items: I, task: F) -> OpsResult<Vec<R>>
    where
        I: IntoIterator<Item = T>,
        T: Send,
        R: Send,
        F: Fn(usize, T) -> R + Sync,
    {
        let items: Vec<T> = items.into_iter().collect();
        trace!(tasks = items.len(), workers = self.workers, "fan_out");

        let mut slots: Vec<Option<std::thread::Result<R>>> = Vec::with_capacity(items.len());
        slots.resize_with(items.len(), || None);

        let task = &task;
        self.pool.scope(|s| {
            for ((index, item), slot) in items.into_iter().enumerate().zip(slots.iter_mut()) {
                s.spawn(move |_| {
                    *slot = Some(panic::catch_unwind(AssertUnwindSafe(|| task(index, item))));
                });
            }
        });

        let mut results = Vec::with_capacity(slots.len());
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(Ok(r)) => results.push(r),
                Some(Err(payload)) => {
                    return Err(OpsError::WorkerPanicked {
                        task: index,
                        message: panic_message(payload.as_ref()),
                    });
                }
                None => {
                    return Err(OpsError::WorkerPool(format!("task {index} never ran")));
                }
            }
        }
        Ok(results)
    }
}

impl std::fmt::Debug for WorkerGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerGroup").field("workers", &self.workers).finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Split of `pixel_count` pixels into contiguous, pixel-aligned chunks.
///
/// Every chunk but the last holds `ceil(pixel_count / threads)` pixels; the
/// last is clipped to the end. Because the chunk size is rounded up, fewer
/// than `threads` chunks may be needed (10 pixels over 6 threads gives five
/// chunks of two); surplus threads get no work rather than empty chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPartition {
    pixel_count: usize,
    threads: usize,
    pixels_per_chunk: usize,
}

impl PixelPartition {
    /// Plans a partition. `threads` below one is coerced to one.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidDimensions`] if `pixel_count` is zero
    /// - [`OpsError::InvalidParameter`] if `threads > pixel_count`, which
    ///   would leave workers without a single pixel
    pub fn new(pixel_count: usize, threads: usize) -> OpsResult<Self> {
        let threads = threads.max(1);
        if pixel_count == 0 {
            return Err(OpsError::InvalidDimensions(
                "cannot partition an empty image".into(),
            ));
        }
        if threads > pixel_count {
            return Err(OpsError::InvalidParameter(format!(
                "{threads} threads for {pixel_count} pixels would create empty work chunks"
            )));
        }
        Ok(Self {
            pixel_count,
            threads,
            pixels_per_chunk: pixel_count.div_ceil(threads),
        })
    }

    /// Requested thread count after coercion.
    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Pixels in every chunk except possibly the last.
    #[inline]
    pub fn pixels_per_chunk(&self) -> usize {
        self.pixels_per_chunk
    }

    /// Samples (three per pixel) in every chunk except possibly the last.
    #[inline]
    pub fn samples_per_chunk(&self) -> usize {
        self.pixels_per_chunk * fif_core::CHANNELS
    }

    /// Number of non-empty chunks.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.pixel_count.div_ceil(self.pixels_per_chunk)
    }

    /// First pixel of chunk `index`.
    #[inline]
    pub fn chunk_start(&self, index: usize) -> usize {
        index * self.pixels_per_chunk
    }
}
