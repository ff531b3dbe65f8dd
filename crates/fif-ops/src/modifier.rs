//! Frequency modifier strategies.
//!
//! A [`FrequencyModifier`] is the one caller-extensible step of the filter:
//! after the forward transform of a channel it receives that channel's
//! frequency-space buffer (mutable) and image-space buffer (read only).
//!
//! All three channels may call the same modifier at the same time from
//! different threads, hence the `Sync` bound. A modifier must not depend
//! on the order channels arrive in.
//!
//! Any `Fn(Channel, &mut [f64], &[f64]) + Sync` closure is a modifier:
//!
//! ```rust
//! use fif_core::Channel;
//! use fif_ops::FrequencyModifier;
//!
//! // keep only the DC term
//! let dc_only = |_: Channel, freq: &mut [f64], _: &[f64]| freq[1..].fill(0.0);
//! let mut freq = vec![8.0, 1.0, 2.0];
//! dc_only.modify(Channel::Red, &mut freq, &[0.0; 3]).unwrap();
//! assert_eq!(freq, vec![8.0, 0.0, 0.0]);
//! ```

use crate::OpsResult;
use fif_core::Channel;

/// Rewrites one channel's frequency-space buffer in place.
pub trait FrequencyModifier: Sync {
    /// Modifies `frequency` for `channel`.
    ///
    /// Both slices hold `width * height` samples; see
    /// [`plan`](crate::plan) for the coefficient layout. Returning an error
    /// aborts the whole filter call and leaves the image untouched.
    fn modify(&self, channel: Channel, frequency: &mut [f64], image: &[f64]) -> OpsResult<()>;
}

impl<F> FrequencyModifier for F
where
    F: Fn(Channel, &mut [f64], &[f64]) + Sync,
{
    #[inline]
    fn modify(&self, channel: Channel, frequency: &mut [f64], image: &[f64]) -> OpsResult<()> {
        self(channel, frequency, image);
        Ok(())
    }
}

/// Leaves the spectrum unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityModifier;

impl FrequencyModifier for IdentityModifier {
    #[inline]
    fn modify(&self, _: Channel, _: &mut [f64], _: &[f64]) -> OpsResult<()> {
        Ok(())
    }
}
