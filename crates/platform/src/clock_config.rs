//! Audio clock gating and bit-clock divider pair.
//!
//! The I2S block derives its word clock from a fixed base frequency `F`
//! through two cascaded 6-bit dividers:
//!
//! ```text
//! rate = F / (clock × bit_clock × 2)
//! ```

use crate::audio_types::OutOfRangeError;

/// Clock gate for the audio block.
pub trait PeripheralClock {
    /// Ungate the clock feeding the I2S block.
    fn enable_clock(&mut self);

    /// Gate it again.
    fn disable_clock(&mut self);
}

/// Validated divider pair, each in `1..=63`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDividers {
    clock: u8,
    bit_clock: u8,
}

impl ClockDividers {
    /// Largest value of either 6-bit divider field.
    pub const MAX_DIVIDER: u8 = 63;

    /// Build a divider pair.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] for the first divider outside `1..=63`.
    pub fn new(clock: u8, bit_clock: u8) -> Result<Self, OutOfRangeError> {
        for divider in [clock, bit_clock] {
            if !(1..=Self::MAX_DIVIDER).contains(&divider) {
                return Err(OutOfRangeError {
                    value: u32::from(divider),
                    min: 1,
                    max: u32::from(Self::MAX_DIVIDER),
                });
            }
        }
        Ok(Self { clock, bit_clock })
    }

    /// Master clock divider.
    pub fn clock(self) -> u8 {
        self.clock
    }

    /// Bit clock divider.
    pub fn bit_clock(self) -> u8 {
        self.bit_clock
    }

    /// Product of both dividers times the two channel slots.
    pub fn total_division(self) -> u32 {
        // Safety: 63 * 63 * 2 = 7938, far below u32::MAX.
        #[allow(clippy::arithmetic_side_effects)]
        {
            u32::from(self.clock) * u32::from(self.bit_clock) * 2
        }
    }

    /// Word rate produced from `base_hz`, rounded down.
    pub fn effective_rate(self, base_hz: u32) -> u32 {
        // total_division() is at least 2
        base_hz.checked_div(self.total_division()).unwrap_or(0)
    }
}
