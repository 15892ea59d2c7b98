//! Tone integration tests: `SineTone` driving a stream on the mock board.
// Integration test file: unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
//!
//! Run with: cargo test -p firmware --test integration_tone

use firmware::tone::SineTone;
use i2s_stream::config::{BUFFER_COUNT, BUFFER_FRAMES};
use i2s_stream::{I2sStream, SessionState};
use platform::mocks::MockBoard;

type ToneStream = I2sStream<MockBoard, SineTone>;

// 750 Hz at 48 kHz: one period per 64-frame buffer.
const RATE_HZ: u32 = 48_000;
const TONE_HZ: u32 = 750;

fn started() -> &'static ToneStream {
    let stream: &'static ToneStream = Box::leak(Box::new(I2sStream::new(MockBoard::new())));
    stream
        .start(SineTone::new(TONE_HZ, RATE_HZ), RATE_HZ)
        .unwrap_or_else(|err| panic!("start failed: {err}"));
    stream
}

fn complete(stream: &'static ToneStream) {
    let isr = stream.with_hardware(MockBoard::raise_completion).unwrap().unwrap();
    // SAFETY: context is the leaked stream; no borrow held.
    unsafe { isr.dispatch() };
}

#[test]
fn every_prefilled_buffer_holds_one_period() {
    assert_eq!(BUFFER_FRAMES, 64);
    let stream = started();
    stream.with_session(|session| {
        let pool = session.unwrap().pool;
        for slot in 0..BUFFER_COUNT {
            let frames = pool.frames(slot).unwrap();
            assert_eq!(frames[0], [0, 0]);
            assert_eq!(frames[16], [32767, 32767]);
            assert_eq!(frames[48], [-32767, -32767]);
        }
    });
}

#[test]
fn refilled_buffer_continues_the_waveform() {
    let stream = started();
    let before = stream.with_session(|s| s.unwrap().pool.frames(0).unwrap().to_vec());
    complete(stream);
    let after = stream.with_session(|s| s.unwrap().pool.frames(0).unwrap().to_vec());
    assert_eq!(before, after);
    assert_eq!(stream.stats().completions, 1);
}

#[test]
fn tone_stream_reaches_requested_rate() {
    let stream = started();
    let rate = stream.with_hardware(|hw| {
        hw.dividers()
            .map(|d| d.effective_rate(platform::mocks::MOCK_BASE_CLOCK_HZ))
            .unwrap()
    }).unwrap();
    assert!(rate.abs_diff(RATE_HZ) <= RATE_HZ / 100, "got {rate} Hz");
    stream.stop();
    assert_eq!(stream.state(), SessionState::Stopped);
}
