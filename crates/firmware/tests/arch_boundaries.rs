//! Architecture boundary tests.
//!
//! Layering: `platform` (traits, mocks) ← `i2s-stream` (generic engine)
//! ← `firmware` (ESP8266 board). The engine must build for any board, so
//! these tests instantiate it over the mock board without `firmware`
//! hardware code.
//!
//! Run with: cargo test -p firmware --test arch_boundaries

use firmware::tone::SineTone;
use i2s_stream::{Render, Silence};
use platform::mocks::MockBoard;
use platform::I2sPlatform;

/// The mock board satisfies every platform seam the engine needs.
#[test]
fn mock_board_is_a_full_platform() {
    fn assert_platform<T: I2sPlatform + Send>() {}
    assert_platform::<MockBoard>();
}

/// Render sources from this crate plug into the generic engine.
#[test]
fn tone_is_a_render_source() {
    fn assert_render<T: Render + Send>() {}
    assert_render::<SineTone>();
    assert_render::<Silence>();
}
