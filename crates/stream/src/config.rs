//! Compile-time stream geometry.
//!
//! Buffer count and size are fixed for the life of the firmware. Latency
//! from render to output is roughly `BUFFER_COUNT - 1` buffer periods:
//! 4 buffers of 64 frames at 44.1 kHz gives about 4.4 ms.

use platform::dma::MAX_DESCRIPTOR_BYTES;
use platform::Frame;

/// Number of buffers in the descriptor ring.
pub const BUFFER_COUNT: usize = 4;

/// Frames (stereo I2S words) per buffer.
pub const BUFFER_FRAMES: usize = 64;

/// Bytes per frame.
pub const FRAME_BYTES: usize = core::mem::size_of::<Frame>();

/// Bytes per buffer; this is the descriptor `blocksize` and `datalen`.
#[allow(clippy::arithmetic_side_effects)] // const-evaluated; bounded by the assertion below
pub const BUFFER_BYTES: usize = BUFFER_FRAMES * FRAME_BYTES;

/// Slots the underrun guard tracks before evicting.
#[allow(clippy::arithmetic_side_effects)] // const-evaluated; BUFFER_COUNT >= 2
pub const GUARD_CAPACITY: usize = BUFFER_COUNT - 1;

const _: () = assert!(BUFFER_COUNT >= 2, "a ring needs at least two buffers");
const _: () = assert!(
    BUFFER_BYTES <= MAX_DESCRIPTOR_BYTES,
    "buffer does not fit the 12-bit descriptor length field"
);
const _: () = assert!(BUFFER_BYTES % 4 == 0, "DMA transfers whole words");
