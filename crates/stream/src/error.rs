//! Stream error type.

use platform::OutOfRangeError;
use thiserror_no_std::Error;

/// Errors returned by [`I2sStream::start`](crate::I2sStream::start).
///
/// Underruns are not errors; they are absorbed inside the completion
/// interrupt and show up in [`StreamStats`](crate::StreamStats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamError {
    /// The buffer pool could not be allocated. Nothing was armed.
    #[error("cannot allocate {bytes} bytes of DMA buffers")]
    Allocation {
        /// Size of the refused request.
        bytes: usize,
    },
    /// The sample rate cannot be produced with the available dividers.
    #[error("sample rate {requested} Hz is outside {min}..={max} Hz")]
    InvalidRate {
        /// Rate asked for.
        requested: u32,
        /// Lowest acceptable rate.
        min: u32,
        /// Highest acceptable rate.
        max: u32,
    },
    /// `start` was called on a running stream.
    #[error("stream is already running")]
    AlreadyRunning,
}

impl From<OutOfRangeError> for StreamError {
    fn from(err: OutOfRangeError) -> Self {
        Self::InvalidRate {
            requested: err.value,
            min: err.min,
            max: err.max,
        }
    }
}
