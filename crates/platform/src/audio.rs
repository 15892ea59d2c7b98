//! Serial audio (I2S) transmitter abstraction.

use crate::clock_config::ClockDividers;

/// I2S block fed by DMA.
///
/// The streaming core only ever transmits. Sample format is fixed to
/// 16-bit stereo, one [`Frame`](crate::Frame) per FIFO word.
pub trait SerialAudio {
    /// Frequency in Hz that the bit-clock dividers divide down.
    fn base_clock_hz(&self) -> u32;

    /// Reset the transmit/receive state machines and FIFOs, and mask and
    /// acknowledge the block's own interrupts.
    fn reset_serial(&mut self);

    /// Select 16-bit stereo FIFO mode with DMA access.
    fn enable_dma_fifo(&mut self);

    /// Program the dividers and master-transmit framing.
    fn set_clock_dividers(&mut self, dividers: ClockDividers);

    /// Start shifting samples out.
    fn start_transmit(&mut self);

    /// Stop shifting samples out.
    fn stop_transmit(&mut self);
}
