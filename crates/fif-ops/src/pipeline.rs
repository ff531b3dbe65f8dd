//! Frequency filter pipeline.
//!
//! [`filter`] runs the whole round trip on an [`Image`] in place:
//!
//! ```text
//! allocate 3 workspaces + build 6 plans
//!   -> split image into channels
//!   -> per channel, concurrently: forward, modify, inverse, renormalize
//!   -> join
//!   -> combine (truncate + clamp) into the image
//! ```
//!
//! The image is written only by the final combine. If any channel fails,
//! whether the modifier returns an error or panics, the call returns that
//! error and the image keeps its original samples. Workspaces and plans are
//! owned values and are released on every exit path.
//!
//! # Example
//!
//! ```rust
//! use fif_core::{Channel, Image};
//! use fif_ops::filter;
//!
//! let mut image = Image::filled(4, 4, [200.0, 100.0, 50.0]).unwrap();
//!
//! // halve every coefficient, which halves every sample
//! let halve = |_: Channel, freq: &mut [f64], _: &[f64]| {
//!     freq.iter_mut().for_each(|v| *v *= 0.5);
//! };
//! filter(&mut image, false, &halve).unwrap();
//!
//! let [r, g, b] = image.pixel(0, 0);
//! assert!((r - 100.0).abs() <= 1.0);
//! assert!((g - 50.0).abs() <= 1.0);
//! assert!((b - 25.0).abs() <= 1.0);
//! ```

use crate::channels::{combine, split};
use crate::modifier::FrequencyModifier;
use crate::parallel::WorkerGroup;
use crate::plan::PlanQuality;
use crate::worker::{renormalization_factor, ChannelJob};
use crate::{OpsError, OpsResult};
use fif_core::{Channel, Image, CHANNELS};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Settings for one [`filter_with`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// Plan construction effort.
    pub quality: PlanQuality,
    /// Threads for the channel fan-out, clamped to `1..=3`.
    pub channel_workers: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            quality: PlanQuality::Estimate,
            channel_workers: CHANNELS,
        }
    }
}

impl FilterConfig {
    /// Default settings with [`PlanQuality::Measure`].
    pub fn self_optimizing() -> Self {
        Self::default().with_quality(PlanQuality::Measure)
    }

    /// Maps the `self_optimize` flag of [`filter`] onto a config.
    pub fn from_self_optimize(self_optimize: bool) -> Self {
        if self_optimize {
            Self::self_optimizing()
        } else {
            Self::default()
        }
    }

    /// Sets the plan quality.
    pub fn with_quality(mut self, quality: PlanQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the channel worker count.
    pub fn with_channel_workers(mut self, workers: usize) -> Self {
        self.channel_workers = workers;
        self
    }

    /// Worker count actually used.
    #[inline]
    pub fn effective_workers(&self) -> usize {
        self.channel_workers.clamp(1, CHANNELS)
    }
}

/// Filters `image` in place through `modifier`.
///
/// `self_optimize` selects [`PlanQuality::Measure`], which makes plan
/// construction slower in exchange for faster transforms.
pub fn filter<M>(image: &mut Image, self_optimize: bool, modifier: &M) -> OpsResult<()>
where
    M: FrequencyModifier + ?Sized,
{
    filter_with(image, &FilterConfig::from_self_optimize(self_optimize), modifier)
}

/// Filters `image` in place using explicit settings.
///
/// # Errors
///
/// - [`OpsError::Core`] if a workspace cannot be allocated
/// - [`OpsError::Channel`] if the modifier fails or panics for a channel
/// - [`OpsError::WorkerPool`] if worker threads cannot be started
///
/// On error `image` is unchanged.
pub fn filter_with<M>(image: &mut Image, config: &FilterConfig, modifier: &M) -> OpsResult<()>
where
    M: FrequencyModifier + ?Sized,
{
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let length = w * h;
    trace!(width, height, ?config, "filter");

    let started = Instant::now();
    let mut jobs = [
        ChannelJob::new(Channel::Red, w, h, config.quality)?,
        ChannelJob::new(Channel::Green, w, h, config.quality)?,
        ChannelJob::new(Channel::Blue, w, h, config.quality)?,
    ];
    debug!(quality = ?config.quality, elapsed = ?started.elapsed(), "plans ready");

    {
        let [red, green, blue] = &mut jobs;
        split(
            image.data(),
            length,
            &mut red.workspace.image_space,
            &mut green.workspace.image_space,
            &mut blue.workspace.image_space,
        )?;
    }

    let renormalization = renormalization_factor(w, h);
    let group = WorkerGroup::new(config.effective_workers())?;
    let outcomes = group
        .fan_out(jobs.iter_mut(), |_, job| job.run(renormalization, modifier))
        .map_err(|e| match e {
            OpsError::WorkerPanicked { task, message } => OpsError::Channel {
                channel: Channel::ALL[task],
                reason: format!("modifier panicked: {message}"),
            },
            other => other,
        });
    let outcomes = match outcomes {
        Ok(outcomes) => outcomes,
        Err(e) => {
            warn!(error = %e, "channel worker failed, image left unchanged");
            return Err(e);
        }
    };
    for outcome in outcomes {
        if let Err(e) = outcome {
            warn!(error = %e, "channel failed, image left unchanged");
            return Err(e);
        }
    }

    let [red, green, blue] = &jobs;
    combine(
        image.data_mut(),
        length,
        &red.workspace.image_space,
        &green.workspace.image_space,
        &blue.workspace.image_space,
    )?;
    debug!(width, height, elapsed = ?started.elapsed(), "filter done");
    Ok(())
}
