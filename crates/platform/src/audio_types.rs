//! Audio domain newtypes.
//!
//! - `Frame`: one I2S word, a left/right pair of signed 16-bit samples
//! - `SampleRateHz`: validates 8000–768000 Hz range

use thiserror_no_std::Error;

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("{value} is outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

// ── Frame ────────────────────────────────────────────────────────────────────

/// One 32-bit I2S word: `[left, right]`.
///
/// The transmitter shifts the word out as two 16-bit channel slots, so a
/// buffer of `n` frames is exactly `4 * n` bytes with no padding.
pub type Frame = [i16; 2];

const _: () = assert!(core::mem::size_of::<Frame>() == 4);

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to 8000–768000 Hz.
///
/// This only bounds the request. Whether a board can actually produce the
/// rate depends on its base clock and divider widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 768000 Hz.
    pub const MAX_HZ: u32 = 768_000;

    /// Create a `SampleRateHz`, returning an error if out of 8000–768000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 768000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if (Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Ok(Self(hz))
        } else {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}
