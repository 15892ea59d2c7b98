//! ESP8266 mask ROM routines.
//!
//! Resolved by the ROM symbol linker script shipped with the SDK.

use core::ffi::c_void;

use platform::IsrHandler;

extern "C" {
    /// Register `handler` for interrupt number `inum`.
    pub fn ets_isr_attach(inum: u32, handler: IsrHandler, arg: *mut c_void);
    /// Mask the interrupts in `mask`.
    pub fn ets_isr_mask(mask: u32);
    /// Unmask the interrupts in `mask`.
    pub fn ets_isr_unmask(mask: u32);
    /// Masked write to an analog block register over the internal I2C bus.
    pub fn rom_i2c_writeReg_Mask(block: u32, host_id: u32, reg: u32, msb: u32, lsb: u32, data: u32);
}

/// Internal I2C block of the baseband PLL.
pub const I2C_BBPLL: u32 = 0x67;
/// Host id of the baseband PLL block.
pub const I2C_BBPLL_HOSTID: u32 = 4;
/// Register and bit of the audio clock output enable.
pub const I2C_BBPLL_EN_AUDIO_CLOCK_OUT: (u32, u32, u32) = (4, 7, 7);
