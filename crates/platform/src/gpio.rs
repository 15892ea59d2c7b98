//! Pin function routing.
//!
//! Audio output only needs to hand a few pins to the I2S block while a
//! stream runs and hand them back afterwards, so this module models a pin
//! by its number and the function currently selected on its mux.

/// Function selected on a pin's multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    /// Plain GPIO input, output driver off.
    Input,
    /// Numbered alternate function (`FUNCTION_n` in vendor docs).
    Alternate(u8),
}

/// A pin the audio block borrows while streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinRoute {
    /// GPIO number.
    pub pin: u8,
    /// Function while the stream runs.
    pub active: PinFunction,
    /// Function restored when the stream stops.
    pub idle: PinFunction,
}

impl PinRoute {
    /// Route description for one pin.
    pub const fn new(pin: u8, active: PinFunction, idle: PinFunction) -> Self {
        Self { pin, active, idle }
    }
}

/// Pin multiplexer.
pub trait PinMux {
    /// Pins carrying the I2S signals on this board.
    const I2S_PINS: &'static [PinRoute];

    /// Select `function` on `pin`.
    fn set_pin_function(&mut self, pin: u8, function: PinFunction);
}
