//! Error types for image operations.

use fif_core::Channel;
use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Buffers have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Worker threads could not be started.
    #[error("worker pool: {0}")]
    WorkerPool(String),

    /// A worker task panicked.
    #[error("worker {task} panicked: {message}")]
    WorkerPanicked {
        /// Index of the task inside its fan-out
        task: usize,
        /// Panic payload, when it was a string
        message: String,
    },

    /// Transform plan could not be built or executed.
    #[error("transform plan: {0}")]
    Plan(String),

    /// Processing of one color channel failed.
    #[error("{channel} channel failed: {reason}")]
    Channel {
        /// Channel that failed
        channel: Channel,
        /// Failure description
        reason: String,
    },

    /// Error from the core containers.
    #[error(transparent)]
    Core(#[from] fif_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Checks that `buf` holds exactly `expected` samples.
pub(crate) fn ensure_len(what: &str, buf: usize, expected: usize) -> OpsResult<()> {
    if buf != expected {
        return Err(OpsError::SizeMismatch(format!(
            "{what}: expected {expected} samples, got {buf}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_message() {
        let err = OpsError::Channel {
            channel: Channel::Blue,
            reason: "modifier rejected input".into(),
        };
        assert_eq!(err.to_string(), "blue channel failed: modifier rejected input");
    }

    #[test]
    fn test_core_error_conversion() {
        let core = fif_core::Image::new(0, 1).unwrap_err();
        let err: OpsError = core.into();
        assert!(matches!(err, OpsError::Core(_)));
        assert!(err.to_string().contains("0x1"));
    }

    #[test]
    fn test_ensure_len() {
        assert!(ensure_len("red", 4, 4).is_ok());
        let err = ensure_len("red", 3, 4).unwrap_err();
        assert!(err.to_string().contains("red: expected 4"));
    }
}
