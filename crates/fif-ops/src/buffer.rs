//! Scratch buffer acquisition for the frequency filter.
//!
//! Every buffer is an owned `Vec` acquired through [`alloc_zeroed`], so
//! allocator exhaustion becomes an error instead of an abort,
//! and release happens on drop along every exit path, early errors included.

use crate::{OpsError, OpsResult};
use tracing::trace;

/// Allocates `len` zeroed elements through [`fif_core::try_filled`].
///
/// Exhaustion surfaces as [`OpsError::Core`] wrapping
/// [`fif_core::Error::AllocationFailed`].
#[inline]
pub fn alloc_zeroed<T: Default + Clone>(len: usize) -> OpsResult<Vec<T>> {
    Ok(fif_core::try_filled(len, T::default())?)
}

/// Image-space and frequency-space buffers of one color channel.
///
/// Both buffers hold `width * height` samples. A workspace is owned by
/// exactly one channel worker and is never shared.
#[derive(Debug)]
pub struct ChannelWorkspace {
    /// Spatial samples of the channel.
    pub image_space: Vec<f64>,
    /// One real coefficient per 2D frequency bin.
    pub frequency_space: Vec<f64>,
}

impl ChannelWorkspace {
    /// Acquires a zeroed workspace of `len` samples per buffer.
    pub fn allocate(len: usize) -> OpsResult<Self> {
        trace!(len, "allocate channel workspace");
        if len == 0 {
            return Err(OpsError::InvalidDimensions(
                "channel workspace must hold at least one sample".into(),
            ));
        }
        Ok(Self {
            image_space: alloc_zeroed(len)?,
            frequency_space: alloc_zeroed(len)?,
        })
    }

    /// Samples per buffer.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.image_space.len()
    }

    /// Borrows both buffers at once: (frequency-space, image-space).
    #[inline]
    pub fn split_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.frequency_space, &mut self.image_space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_allocate() {
        let ws = ChannelWorkspace::allocate(12).unwrap();
        assert_eq!(ws.len(), 12);
        assert_eq!(ws.frequency_space.len(), 12);
        assert!(ws.image_space.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_workspace_empty_rejected() {
        assert!(matches!(
            ChannelWorkspace::allocate(0),
            Err(OpsError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_alloc_exhaustion_is_error() {
        let err = alloc_zeroed::<f64>(usize::MAX / 4).unwrap_err();
        match err {
            OpsError::Core(core) => assert!(core.is_allocation_error()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
