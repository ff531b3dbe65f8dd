//! Per-channel transform-and-modify step.
//!
//! Each color channel runs the same four steps on its own workspace:
//!
//! 1. forward plan, image-space -> frequency-space
//! 2. [`FrequencyModifier::modify`] on the frequency-space buffer
//! 3. inverse plan, frequency-space -> image-space
//! 4. scale image-space by [`renormalization_factor`]
//!
//! The forward/inverse pair scales every sample by `4 * width * height`;
//! step 4 multiplies by exactly the reciprocal.

use crate::buffer::ChannelWorkspace;
use crate::dct::Direction;
use crate::modifier::FrequencyModifier;
use crate::plan::{PlanQuality, TransformPlan};
use crate::{OpsError, OpsResult};
use fif_core::Channel;
use tracing::trace;

/// Factor restoring true amplitude after a forward/inverse round trip.
///
/// Equals `0.25 / (width * height)`.
#[inline]
pub fn renormalization_factor(width: usize, height: usize) -> f64 {
    0.25 / (width * height) as f64
}

/// Multiplies every sample by `factor`.
#[inline]
pub fn multiply_all(samples: &mut [f64], factor: f64) {
    for v in samples.iter_mut() {
        *v *= factor;
    }
}

/// Everything one channel worker owns: its workspace and both plans.
#[derive(Debug)]
pub struct ChannelJob {
    /// Channel being processed.
    pub channel: Channel,
    /// Image-space -> frequency-space plan.
    pub forward: TransformPlan,
    /// Frequency-space -> image-space plan.
    pub inverse: TransformPlan,
    /// Buffers exclusive to this channel.
    pub workspace: ChannelWorkspace,
}

impl ChannelJob {
    /// Allocates a `width x height` workspace and builds both plans on it.
    ///
    /// Plans are built first so that [`PlanQuality::Measure`] may scribble
    /// over the buffers; the workspace is zeroed again before returning.
    pub fn new(
        channel: Channel,
        width: usize,
        height: usize,
        quality: PlanQuality,
    ) -> OpsResult<Self> {
        let mut workspace = ChannelWorkspace::allocate(width * height)?;
        let forward = TransformPlan::new(
            Direction::Forward,
            width,
            height,
            quality,
            &workspace.image_space,
            &mut workspace.frequency_space,
        )?;
        let inverse = TransformPlan::new(
            Direction::Inverse,
            width,
            height,
            quality,
            &workspace.frequency_space,
            &mut workspace.image_space,
        )?;
        workspace.image_space.fill(0.0);
        workspace.frequency_space.fill(0.0);
        Ok(Self {
            channel,
            forward,
            inverse,
            workspace,
        })
    }

    /// Runs [`transform_and_modify`] on this job's buffers.
    pub fn run<M>(&mut self, renormalization: f64, modifier: &M) -> OpsResult<()>
    where
        M: FrequencyModifier + ?Sized,
    {
        transform_and_modify(
            self.channel,
            &mut self.forward,
            &mut self.inverse,
            &mut self.workspace,
            renormalization,
            modifier,
        )
    }
}

/// Forward transform, modify, inverse transform and renormalize one channel.
///
/// On return the channel's image-space buffer holds the filtered samples at
/// their original amplitude. Errors from the modifier are tagged with the
/// channel.
pub fn transform_and_modify<M>(
    channel: Channel,
    forward: &mut TransformPlan,
    inverse: &mut TransformPlan,
    workspace: &mut ChannelWorkspace,
    renormalization: f64,
    modifier: &M,
) -> OpsResult<()>
where
    M: FrequencyModifier + ?Sized,
{
    trace!(%channel, len = workspace.len(), "transform_and_modify");

    forward.execute(&workspace.image_space, &mut workspace.frequency_space)?;

    let (frequency, image) = workspace.split_mut();
    modifier
        .modify(channel, frequency, image)
        .map_err(|e| OpsError::Channel {
            channel,
            reason: e.to_string(),
        })?;

    inverse.execute(&workspace.frequency_space, &mut workspace.image_space)?;
    multiply_all(&mut workspace.image_space, renormalization);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::IdentityModifier;
    use approx::assert_abs_diff_eq;

    fn job(channel: Channel, w: usize, h: usize, samples: &[f64]) -> ChannelJob {
        let mut j = ChannelJob::new(channel, w, h, PlanQuality::Estimate).unwrap();
        j.workspace.image_space.copy_from_slice(samples);
        j
    }

    #[test]
    fn test_renormalization_factor() {
        assert_eq!(renormalization_factor(1, 1), 0.25);
        assert_eq!(renormalization_factor(2, 2), 0.0625);
        assert_abs_diff_eq!(renormalization_factor(640, 480) * 4.0 * 640.0 * 480.0, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_multiply_all_touches_every_sample() {
        let mut v = vec![1.0, 2.0, 3.0, 4.0];
        multiply_all(&mut v, 0.5);
        assert_eq!(v, vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_identity_restores_amplitude() {
        let (w, h) = (5, 3);
        let samples: Vec<f64> = (0..w * h).map(|i| (i * 13 % 256) as f64).collect();
        let mut j = job(Channel::Green, w, h, &samples);
        j.run(renormalization_factor(w, h), &IdentityModifier).unwrap();
        for (a, b) in j.workspace.image_space.iter().zip(&samples) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_modifier_sees_forward_output() {
        let (w, h) = (2, 2);
        let mut j = job(Channel::Red, w, h, &[4.0; 4]);
        let check = |ch: Channel, freq: &mut [f64], image: &[f64]| {
            assert_eq!(ch, Channel::Red);
            assert_eq!(image.len(), 4);
            // DC = 4 * w * h * mean
            assert!((freq[0] - 64.0).abs() < 1e-9);
            freq[0] *= 2.0;
        };
        j.run(renormalization_factor(w, h), &check).unwrap();
        for v in &j.workspace.image_space {
            assert_abs_diff_eq!(*v, 8.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_modifier_error_tagged_with_channel() {
        struct Fail;
        impl FrequencyModifier for Fail {
            fn modify(&self, _: Channel, _: &mut [f64], _: &[f64]) -> OpsResult<()> {
                Err(OpsError::InvalidParameter("nope".into()))
            }
        }
        let mut j = job(Channel::Blue, 2, 1, &[1.0, 2.0]);
        let err = j.run(renormalization_factor(2, 1), &Fail).unwrap_err();
        assert!(matches!(err, OpsError::Channel { channel: Channel::Blue, .. }));
    }

    #[test]
    fn test_new_job_after_measure_is_zeroed() {
        let j = ChannelJob::new(Channel::Red, 4, 3, PlanQuality::Measure).unwrap();
        assert_eq!(j.workspace.len(), 12);
        assert!(j.workspace.image_space.iter().all(|v| *v == 0.0));
        assert!(j.workspace.frequency_space.iter().all(|v| *v == 0.0));
        assert_eq!(j.forward.dimensions(), (4, 3));
        assert_eq!(j.inverse.direction(), Direction::Inverse);
    }
}
