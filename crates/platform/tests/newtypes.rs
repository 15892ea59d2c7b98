//! Type system enforcement tests for the audio newtypes.
//! Range checks here stop nonsense rates and dividers before they reach a register.

// ── SampleRateHz ─────────────────────────────────────────────────────────────

#[test]
fn sample_rate_accepts_common_rates() {
    use platform::audio_types::SampleRateHz;
    for hz in [8_000, 16_000, 22_050, 44_100, 48_000, 96_000, 768_000] {
        assert_eq!(SampleRateHz::new(hz).map(SampleRateHz::get), Ok(hz));
    }
}

#[test]
fn sample_rate_rejects_below_minimum() {
    use platform::audio_types::{OutOfRangeError, SampleRateHz};
    assert_eq!(
        SampleRateHz::new(7_999),
        Err(OutOfRangeError {
            value: 7_999,
            min: 8_000,
            max: 768_000
        })
    );
    assert!(SampleRateHz::new(0).is_err());
}

#[test]
fn sample_rate_rejects_above_maximum() {
    use platform::audio_types::SampleRateHz;
    assert!(SampleRateHz::new(768_001).is_err());
    assert!(SampleRateHz::new(u32::MAX).is_err());
}

#[test]
fn sample_rate_is_transparent() {
    use platform::audio_types::SampleRateHz;
    assert_eq!(core::mem::size_of::<SampleRateHz>(), 4);
}

// ── Frame ────────────────────────────────────────────────────────────────────

#[test]
fn frame_is_one_i2s_word() {
    use platform::Frame;
    // Left/right 16-bit pair packs into one 32-bit FIFO word.
    assert_eq!(core::mem::size_of::<Frame>(), 4);
}

// ── ClockDividers ────────────────────────────────────────────────────────────

#[test]
fn clock_dividers_accept_full_six_bit_range() {
    use platform::ClockDividers;
    assert!(ClockDividers::new(1, 63).is_ok());
    assert!(ClockDividers::new(63, 1).is_ok());
}

#[test]
fn clock_dividers_reject_zero() {
    use platform::ClockDividers;
    // A zero divider would stop the bit clock entirely.
    assert!(ClockDividers::new(0, 1).is_err());
    assert!(ClockDividers::new(1, 0).is_err());
}

#[test]
fn out_of_range_error_displays_bounds() {
    use platform::OutOfRangeError;
    let err = OutOfRangeError {
        value: 64,
        min: 1,
        max: 63,
    };
    assert_eq!(err.to_string(), "64 is outside 1..=63");
}
