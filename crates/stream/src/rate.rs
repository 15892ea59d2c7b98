//! Sample rate to divider translation.
//!
//! The transmitter produces `F / (clock × bit_clock × 2)` words per second,
//! with both dividers held in 6-bit fields. The configurator searches that
//! grid for the pair whose reconstructed rate lands closest to the request,
//! and refuses rates no pair can reach instead of writing a zero or
//! wrapped divider.

use platform::{ClockDividers, SampleRateHz};

use crate::error::StreamError;

const MAX: u32 = ClockDividers::MAX_DIVIDER as u32;

/// Divider search for one base clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateConfigurator {
    base_hz: u32,
}

impl RateConfigurator {
    /// Configurator for a transmitter clocked at `base_hz`.
    pub const fn new(base_hz: u32) -> Self {
        Self { base_hz }
    }

    /// Base clock in Hz.
    pub const fn base_hz(&self) -> u32 {
        self.base_hz
    }

    /// Slowest reachable rate, `F / (2 × 63 × 63)`.
    #[allow(clippy::arithmetic_side_effects)] // constant non-zero divisor
    pub const fn min_rate(&self) -> u32 {
        self.base_hz / (2 * MAX * MAX)
    }

    /// Fastest reachable rate, `F / 2`.
    #[allow(clippy::arithmetic_side_effects)] // constant non-zero divisor
    pub const fn max_rate(&self) -> u32 {
        self.base_hz / 2
    }

    /// Dividers whose rate is closest to `rate`. Ties go to the smaller
    /// master clock divider.
    ///
    /// # Errors
    ///
    /// [`StreamError::InvalidRate`] if `rate` lies outside
    /// [`min_rate`](Self::min_rate)`..=`[`max_rate`](Self::max_rate).
    pub fn configure(&self, rate: SampleRateHz) -> Result<ClockDividers, StreamError> {
        let requested = rate.get();
        let (min, max) = (self.min_rate(), self.max_rate());
        if requested < min || requested > max {
            return Err(StreamError::InvalidRate {
                requested,
                min,
                max,
            });
        }

        let mut best = (1u8, 1u8);
        let mut best_error = u32::MAX;
        'search: for clock in 1..=ClockDividers::MAX_DIVIDER {
            for bit_clock in 1..=ClockDividers::MAX_DIVIDER {
                let error = self.rate_for(clock, bit_clock).abs_diff(requested);
                if error < best_error {
                    best = (clock, bit_clock);
                    best_error = error;
                    if error == 0 {
                        break 'search;
                    }
                }
            }
        }

        Ok(ClockDividers::new(best.0, best.1)?)
    }

    #[allow(clippy::arithmetic_side_effects)] // dividers are 1..=63: product <= 7938, never zero
    fn rate_for(&self, clock: u8, bit_clock: u8) -> u32 {
        self.base_hz / (u32::from(clock) * u32::from(bit_clock) * 2)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    const ESP8266_BASE_HZ: u32 = 160_000_000;

    fn rate(hz: u32) -> SampleRateHz {
        SampleRateHz::new(hz).unwrap()
    }

    #[test]
    fn sixteen_khz_is_exact_with_audio_base_clock() {
        // 12.288 MHz = 16 kHz * 768, reachable as 12 * 32 * 2.
        let configurator = RateConfigurator::new(12_288_000);
        let dividers = configurator.configure(rate(16_000)).unwrap();
        let actual = dividers.effective_rate(12_288_000);
        assert!(actual.abs_diff(16_000) <= 1, "got {actual} Hz");
    }

    #[test]
    fn cd_quality_close_on_esp8266_clock() {
        let dividers = RateConfigurator::new(ESP8266_BASE_HZ)
            .configure(rate(44_100))
            .unwrap();
        let actual = dividers.effective_rate(ESP8266_BASE_HZ);
        // 0.1 % is well below audible pitch error.
        assert!(actual.abs_diff(44_100) <= 44, "got {actual} Hz");
    }

    #[test]
    fn rates_below_grid_are_rejected() {
        // 160 MHz / 7938 = 20156 Hz is the slowest the ESP8266 can go.
        let configurator = RateConfigurator::new(ESP8266_BASE_HZ);
        assert_eq!(configurator.min_rate(), 20_156);
        assert_eq!(
            configurator.configure(rate(16_000)),
            Err(StreamError::InvalidRate {
                requested: 16_000,
                min: 20_156,
                max: 80_000_000
            })
        );
    }

    #[test]
    fn rates_above_grid_are_rejected() {
        // 1 MHz base clock tops out at 500 kHz.
        let configurator = RateConfigurator::new(1_000_000);
        assert!(matches!(
            configurator.configure(rate(768_000)),
            Err(StreamError::InvalidRate { max: 500_000, .. })
        ));
        assert!(configurator.configure(rate(500_000)).is_ok());
    }

    #[test]
    fn configuration_is_deterministic() {
        let configurator = RateConfigurator::new(ESP8266_BASE_HZ);
        assert_eq!(
            configurator.configure(rate(48_000)),
            configurator.configure(rate(48_000))
        );
    }

    #[test]
    fn exact_pair_prefers_smaller_clock_divider() {
        // 16 kHz from 12.288 MHz needs clock * bit_clock = 384. With both
        // dividers <= 63 the smallest usable clock divider is 8 (8 * 48).
        let dividers = RateConfigurator::new(12_288_000)
            .configure(rate(16_000))
            .unwrap();
        assert_eq!((dividers.clock(), dividers.bit_clock()), (8, 48));
    }

    proptest::proptest! {
        /// Reconstructed rate stays within 2 % across the reachable range.
        #[test]
        fn reconstruction_tracks_request(hz in 21_000u32..=768_000) {
            let configurator = RateConfigurator::new(ESP8266_BASE_HZ);
            let dividers = configurator.configure(rate(hz)).unwrap();
            let actual = dividers.effective_rate(ESP8266_BASE_HZ);
            assert!(
                u64::from(actual.abs_diff(hz)) * 50 <= u64::from(hz),
                "{hz} Hz -> {actual} Hz with {dividers:?}"
            );
        }
    }
}
