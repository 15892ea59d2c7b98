//! ESP8266 register map for the SLC DMA engine, I2S block and IO mux.
//!
//! Addresses are offsets from the peripheral window at `0x6000_0000`. Field
//! names follow the SDK header abbreviations so they can be cross-checked
//! against the technical reference.
//!
//! The `*_conf` functions compute register values from their current
//! contents without touching hardware, so every bit manipulation the board
//! performs is testable on the host.

// Bit-field shifts by constant amounts throughout.
#![allow(clippy::arithmetic_side_effects)]

use platform::ClockDividers;

/// Start of the memory-mapped peripheral window.
pub const PERIPHERAL_BASE: usize = 0x6000_0000;

/// I2S master clock: the 160 MHz PLL output.
pub const I2S_BASE_FREQ_HZ: u32 = 160_000_000;

/// ROM interrupt number of the SLC engine.
pub const ETS_SLC_INUM: u32 = 1;
/// Bit of the SLC source in the ROM interrupt mask.
pub const ETS_SLC_MASK: u32 = 1 << ETS_SLC_INUM;

/// A 32-bit memory-mapped register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(usize);

impl Reg {
    const fn at(offset: usize) -> Self {
        Self(PERIPHERAL_BASE + offset)
    }

    /// Absolute address.
    pub const fn address(self) -> usize {
        self.0
    }

    /// Volatile read.
    #[cfg(feature = "hardware")]
    pub(crate) fn read(self) -> u32 {
        // SAFETY: `Reg` values only come from the constants in this module,
        // each an aligned, always-mapped peripheral register.
        unsafe { core::ptr::read_volatile(self.0 as *const u32) }
    }

    /// Volatile write.
    #[cfg(feature = "hardware")]
    pub(crate) fn write(self, value: u32) {
        // SAFETY: as in `read`.
        unsafe { core::ptr::write_volatile(self.0 as *mut u32, value) }
    }

    /// Read, transform, write back.
    #[cfg(feature = "hardware")]
    pub(crate) fn modify(self, f: impl FnOnce(u32) -> u32) {
        self.write(f(self.read()));
    }
}

// ── SLC (link-list DMA) ─────────────────────────────────────────────────────

/// SLC_CONF0
pub const SLCC0: Reg = Reg::at(0xB00);
/// SLC_INT_STATUS
pub const SLCIS: Reg = Reg::at(0xB08);
/// SLC_INT_ENA
pub const SLCIE: Reg = Reg::at(0xB0C);
/// SLC_INT_CLR
pub const SLCIC: Reg = Reg::at(0xB10);
/// SLC_RX_LINK: the link that carries memory *to* the I2S FIFO.
pub const SLCRXL: Reg = Reg::at(0xB24);
/// SLC_TX_LINK
pub const SLCTXL: Reg = Reg::at(0xB28);
/// SLC_RX_EOF_DES_ADDR: last finished RX-link descriptor.
pub const SLCRXEDA: Reg = Reg::at(0xB48);
/// SLC_RX_DSCR_CONF
pub const SLCRXDC: Reg = Reg::at(0xB5C);

/// SLC_CONF0: TX link reset.
pub const SLCTXLR: u32 = 1 << 0;
/// SLC_CONF0: RX link reset.
pub const SLCRXLR: u32 = 1 << 1;
/// SLC_CONF0: DMA mode field shift.
pub const SLCM: u32 = 12;
/// SLC_CONF0: DMA mode field mask.
pub const SLCMM: u32 = 0x3;

/// SLC interrupt: RX link end-of-frame.
pub const SLCIRXEOF: u32 = 1 << 17;

/// SLC_RX/TX_LINK: link address field mask (shift 0).
pub const SLC_LINK_ADDR_MASK: u32 = 0x000F_FFFF;
/// SLC_RX/TX_LINK: start.
pub const SLC_LINK_START: u32 = 1 << 29;

/// SLC_RX_DSCR_CONF: token no replace.
pub const SLCBTNR: u32 = 1 << 16;
/// SLC_RX_DSCR_CONF: info no replace.
pub const SLCBINR: u32 = 1 << 17;
/// SLC_RX_DSCR_CONF: fill mode.
pub const SLCBRXFM: u32 = 1 << 18;
/// SLC_RX_DSCR_CONF: EOF mode.
pub const SLCBRXEM: u32 = 1 << 19;
/// SLC_RX_DSCR_CONF: fill enable.
pub const SLCBRXFE: u32 = 1 << 20;

// ── I2S ─────────────────────────────────────────────────────────────────────

/// I2SCONF
pub const I2SC: Reg = Reg::at(0xE08);
/// I2SINT_ENA
pub const I2SIE: Reg = Reg::at(0xE14);
/// I2SINT_CLR
pub const I2SIC: Reg = Reg::at(0xE18);
/// I2S_FIFO_CONF
pub const I2SFC: Reg = Reg::at(0xE20);
/// I2SCONF_CHAN
pub const I2SCC: Reg = Reg::at(0xE2C);

/// I2SCONF: TX/RX and FIFO reset bits.
pub const I2SRST: u32 = 0xF;
/// I2SCONF: transmit slave mode.
pub const I2STSM: u32 = 1 << 4;
/// I2SCONF: receive slave mode.
pub const I2SRSM: u32 = 1 << 5;
/// I2SCONF: right channel first.
pub const I2SRF: u32 = 1 << 6;
/// I2SCONF: MSB right.
pub const I2SMR: u32 = 1 << 7;
/// I2SCONF: transmit start.
pub const I2STXS: u32 = 1 << 8;
/// I2SCONF: receive MSB shift.
pub const I2SRMS: u32 = 1 << 11;
/// I2SCONF: bits mode field shift.
pub const I2SBM: u32 = 12;
/// I2SCONF: bits mode field mask.
pub const I2SBMM: u32 = 0xF;
/// I2SCONF: clock divider field shift.
pub const I2SCD: u32 = 16;
/// I2SCONF: bit clock divider field shift.
pub const I2SBD: u32 = 22;
/// I2SCONF: divider field mask (6 bits).
pub const I2S_DIV_MASK: u32 = 0x3F;

/// I2S interrupt clear: all six sources.
pub const I2S_INT_ALL: u32 = 0x3F;

/// I2S_FIFO_CONF: DMA enable.
pub const I2SDE: u32 = 1 << 12;
/// I2S_FIFO_CONF: TX FIFO mode shift.
pub const I2STXFM: u32 = 13;
/// I2S_FIFO_CONF: RX FIFO mode shift.
pub const I2SRXFM: u32 = 16;
/// I2S_FIFO_CONF: FIFO mode mask.
pub const I2SFMM: u32 = 0x7;

/// I2SCONF_CHAN: TX channel mode shift.
pub const I2STXCM: u32 = 0;
/// I2SCONF_CHAN: TX channel mode mask.
pub const I2STXCMM: u32 = 0x7;
/// I2SCONF_CHAN: RX channel mode shift.
pub const I2SRXCM: u32 = 3;
/// I2SCONF_CHAN: RX channel mode mask.
pub const I2SRXCMM: u32 = 0x3;

// ── GPIO / IO mux ───────────────────────────────────────────────────────────

/// GPIO_ENABLE_W1TC: output enable clear.
pub const GPEC: Reg = Reg::at(0x314);

/// IO mux register offset per GPIO 0..=15.
const IOMUX_OFFSETS: [usize; 16] = [
    0x34, 0x18, 0x38, 0x14, 0x3C, 0x40, 0x1C, 0x20, 0x24, 0x28, 0x2C, 0x30, 0x04, 0x08, 0x0C,
    0x10,
];

/// IO mux register for `pin`; GPIO16 lives in the RTC block and is not
/// covered.
pub fn iomux(pin: u8) -> Option<Reg> {
    IOMUX_OFFSETS
        .get(usize::from(pin))
        .map(|offset| Reg::at(0x800 | offset))
}

/// IO mux value selecting function number `function` (0..=4).
///
/// Bits 0..=1 of the function number land in bits 4..=5, bit 2 in bit 8.
pub const fn iomux_function(function: u8) -> u32 {
    let f = function as u32;
    ((f & 0x4) << 6) | ((f & 0x3) << 4)
}

/// Function number that makes `pin` a plain GPIO.
pub const fn gpio_function(pin: u8) -> u8 {
    match pin {
        0 | 2 | 4 | 5 => 0,
        _ => 3,
    }
}

// ── Encoders ────────────────────────────────────────────────────────────────

/// SLC_CONF0 with DMA mode 1 selected.
pub const fn slc_conf0_outbound(current: u32) -> u32 {
    (current & !(SLCMM << SLCM)) | (1 << SLCM)
}

/// SLC_RX_DSCR_CONF: keep descriptor info and tokens, no fill or EOF modes.
pub const fn slc_rx_dscr_conf(current: u32) -> u32 {
    (current | SLCBINR | SLCBTNR) & !(SLCBRXFE | SLCBRXEM | SLCBRXFM)
}

/// Link register with its address field replaced by `descriptor`'s low
/// 20 bits; the DRAM window supplies the rest.
pub fn slc_link(current: u32, descriptor: usize) -> u32 {
    let address = (descriptor as u32) & SLC_LINK_ADDR_MASK;
    (current & !SLC_LINK_ADDR_MASK) | address
}

/// I2S_FIFO_CONF: 16-bit stereo in both FIFOs, DMA access on.
pub const fn i2s_fifo_conf(current: u32) -> u32 {
    (current & !((I2SFMM << I2STXFM) | (I2SFMM << I2SRXFM))) | I2SDE
}

/// I2SCONF_CHAN: dual-channel mode 0 on TX and RX.
pub const fn i2s_channel_conf(current: u32) -> u32 {
    current & !((I2STXCMM << I2STXCM) | (I2SRXCMM << I2SRXCM))
}

/// I2SCONF for master transmit with `dividers`.
///
/// Divider fields hold `divider - 1`. Slave mode and bits mode are cleared;
/// right-first, MSB-right and receive MSB shift are set.
pub fn i2s_conf_clock(current: u32, dividers: ClockDividers) -> u32 {
    let cleared = current
        & !(I2STSM | (I2SBMM << I2SBM) | (I2S_DIV_MASK << I2SBD) | (I2S_DIV_MASK << I2SCD));
    let bit_clock = u32::from(dividers.bit_clock().saturating_sub(1)) & I2S_DIV_MASK;
    let clock = u32::from(dividers.clock().saturating_sub(1)) & I2S_DIV_MASK;
    cleared | I2SRF | I2SMR | I2SRSM | I2SRMS | (bit_clock << I2SBD) | (clock << I2SCD)
}
