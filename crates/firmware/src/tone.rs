//! Sine tone render source for bring-up.
//!
//! A 64-point table walked by a 32-bit phase accumulator; the top six bits
//! of the phase select the table entry. Both channels carry the same
//! sample.

use i2s_stream::{Frame, Render};

const SINE: [i16; 64] = [
    0, 3212, 6393, 9512, 12539, 15446, 18204, 20787,
    23170, 25329, 27245, 28898, 30273, 31356, 32137, 32609,
    32767, 32609, 32137, 31356, 30273, 28898, 27245, 25329,
    23170, 20787, 18204, 15446, 12539, 9512, 6393, 3212,
    0, -3212, -6393, -9512, -12539, -15446, -18204, -20787,
    -23170, -25329, -27245, -28898, -30273, -31356, -32137, -32609,
    -32767, -32609, -32137, -31356, -30273, -28898, -27245, -25329,
    -23170, -20787, -18204, -15446, -12539, -9512, -6393, -3212,
];

const INDEX_SHIFT: u32 = 26;

/// Fixed-frequency sine at full scale, optionally attenuated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SineTone {
    phase: u32,
    step: u32,
    attenuation: u32,
}

impl SineTone {
    /// `frequency_hz` tone for a stream running at `rate_hz`.
    ///
    /// A zero rate produces silence.
    pub fn new(frequency_hz: u32, rate_hz: u32) -> Self {
        let step = (u64::from(frequency_hz) << 32)
            .checked_div(u64::from(rate_hz))
            .unwrap_or(0);
        Self {
            phase: 0,
            step: step as u32,
            attenuation: 0,
        }
    }

    /// Attenuate by `shift` × 6 dB.
    #[must_use]
    pub fn attenuated(mut self, shift: u32) -> Self {
        self.attenuation = shift.min(15);
        self
    }

    fn next_sample(&mut self) -> i16 {
        let index = (self.phase >> INDEX_SHIFT) as usize;
        self.phase = self.phase.wrapping_add(self.step);
        SINE.get(index)
            .copied()
            .and_then(|sample| sample.checked_shr(self.attenuation))
            .unwrap_or(0)
    }
}

impl Render for SineTone {
    fn render(&mut self, frames: &mut [Frame]) {
        for frame in frames {
            let sample = self.next_sample();
            *frame = [sample, sample];
        }
    }
}
