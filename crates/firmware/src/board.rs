//! ESP8266 implementation of the platform traits.
//!
//! [`Esp8266`] is a zero-sized handle; all state lives in the peripheral
//! registers. Put exactly one in an `I2sStream`.

use core::alloc::Layout;
use core::ffi::c_void;
use core::ptr::NonNull;

use platform::{
    BufferAllocator, ClockDividers, DmaInterrupts, GlobalHeap, InterruptLine, IsrHandler,
    LinkDescriptor, LinkDma, PeripheralClock, PinFunction, PinMux, PinRoute, SerialAudio,
};

use crate::registers::{
    gpio_function, i2s_channel_conf, i2s_conf_clock, i2s_fifo_conf, iomux, iomux_function,
    slc_conf0_outbound, slc_link, slc_rx_dscr_conf, ETS_SLC_INUM, ETS_SLC_MASK, GPEC, I2SC,
    I2SCC, I2SFC, I2SIC, I2SIE, I2SRST, I2STXS, I2S_BASE_FREQ_HZ, I2S_INT_ALL, SLCC0, SLCIC,
    SLCIE, SLCIRXEOF, SLCIS, SLCRXDC, SLCRXEDA, SLCRXL, SLCRXLR, SLCTXL, SLCTXLR,
    SLC_LINK_ADDR_MASK, SLC_LINK_START,
};
use crate::rom;

/// GPIO15 = BCK, GPIO3 = DATA, GPIO2 = WS. GPIO3 returns to UART0 RX.
const I2S_PINS: &[PinRoute] = &[
    PinRoute::new(15, PinFunction::Alternate(1), PinFunction::Input),
    PinRoute::new(3, PinFunction::Alternate(1), PinFunction::Alternate(0)),
    PinRoute::new(2, PinFunction::Alternate(1), PinFunction::Input),
];

/// ESP8266 SLC + I2S + IO mux.
#[derive(Debug, Default)]
pub struct Esp8266 {
    _private: (),
}

impl Esp8266 {
    /// The board handle. Create only one.
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

unsafe extern "C" fn idle_isr(_context: *mut c_void) {}

impl LinkDma for Esp8266 {
    fn reset_links(&mut self) {
        SLCC0.modify(|v| v | SLCRXLR | SLCTXLR);
        SLCC0.modify(|v| v & !(SLCRXLR | SLCTXLR));
    }

    fn configure_outbound(&mut self) {
        SLCC0.modify(slc_conf0_outbound);
        SLCRXDC.modify(slc_rx_dscr_conf);
    }

    unsafe fn set_links(&mut self, outbound: *const LinkDescriptor, inbound: *const LinkDescriptor) {
        // The SLC "RX" link feeds the I2S transmitter.
        SLCTXL.modify(|v| slc_link(v, inbound as usize));
        SLCRXL.modify(|v| slc_link(v, outbound as usize));
    }

    fn clear_links(&mut self) {
        SLCTXL.modify(|v| v & !(SLC_LINK_ADDR_MASK | SLC_LINK_START));
        SLCRXL.modify(|v| v & !(SLC_LINK_ADDR_MASK | SLC_LINK_START));
    }

    fn start_links(&mut self) {
        SLCTXL.modify(|v| v | SLC_LINK_START);
        SLCRXL.modify(|v| v | SLC_LINK_START);
    }

    fn enable_eof_interrupt(&mut self) {
        SLCIE.write(SLCIRXEOF);
    }

    fn disable_interrupts(&mut self) {
        SLCIE.write(0);
    }

    fn clear_interrupts(&mut self) {
        SLCIC.write(u32::MAX);
    }

    fn take_interrupts(&mut self) -> DmaInterrupts {
        let status = SLCIS.read();
        SLCIC.write(u32::MAX);
        DmaInterrupts {
            outbound_eof: status & SLCIRXEOF != 0,
        }
    }

    fn finished_descriptor(&self) -> *const LinkDescriptor {
        SLCRXEDA.read() as usize as *const LinkDescriptor
    }
}

impl InterruptLine for Esp8266 {
    unsafe fn attach_isr(&mut self, handler: IsrHandler, context: *mut c_void) {
        // SAFETY: the ROM stores the pair; the caller keeps `context` alive
        // until `detach_isr`.
        unsafe { rom::ets_isr_attach(ETS_SLC_INUM, handler, context) }
    }

    fn detach_isr(&mut self) {
        // The ROM has no detach; park a handler that touches nothing.
        // SAFETY: `idle_isr` ignores its (null) context.
        unsafe { rom::ets_isr_attach(ETS_SLC_INUM, idle_isr, core::ptr::null_mut()) }
    }

    fn enable_isr(&mut self) {
        // SAFETY: only changes the interrupt enable mask.
        unsafe { rom::ets_isr_unmask(ETS_SLC_MASK) }
    }

    fn disable_isr(&mut self) {
        // SAFETY: only changes the interrupt enable mask.
        unsafe { rom::ets_isr_mask(ETS_SLC_MASK) }
    }
}

impl SerialAudio for Esp8266 {
    fn base_clock_hz(&self) -> u32 {
        I2S_BASE_FREQ_HZ
    }

    fn reset_serial(&mut self) {
        I2SIC.write(I2S_INT_ALL);
        I2SIE.write(0);
        I2SC.modify(|v| v & !I2SRST);
        I2SC.modify(|v| v | I2SRST);
        I2SC.modify(|v| v & !I2SRST);
    }

    fn enable_dma_fifo(&mut self) {
        I2SFC.modify(i2s_fifo_conf);
        I2SCC.modify(i2s_channel_conf);
    }

    fn set_clock_dividers(&mut self, dividers: ClockDividers) {
        I2SC.modify(|v| i2s_conf_clock(v, dividers));
    }

    fn start_transmit(&mut self) {
        I2SC.modify(|v| v | I2STXS);
    }

    fn stop_transmit(&mut self) {
        I2SC.modify(|v| v & !I2STXS);
    }
}

impl PeripheralClock for Esp8266 {
    fn enable_clock(&mut self) {
        set_audio_clock(true);
    }

    fn disable_clock(&mut self) {
        set_audio_clock(false);
    }
}

fn set_audio_clock(on: bool) {
    let (reg, msb, lsb) = rom::I2C_BBPLL_EN_AUDIO_CLOCK_OUT;
    // SAFETY: writes one documented PLL control bit.
    unsafe {
        rom::rom_i2c_writeReg_Mask(
            rom::I2C_BBPLL,
            rom::I2C_BBPLL_HOSTID,
            reg,
            msb,
            lsb,
            u32::from(on),
        );
    }
}

impl PinMux for Esp8266 {
    const I2S_PINS: &'static [PinRoute] = I2S_PINS;

    fn set_pin_function(&mut self, pin: u8, function: PinFunction) {
        let Some(mux) = iomux(pin) else {
            return;
        };
        match function {
            PinFunction::Alternate(number) => mux.write(iomux_function(number)),
            PinFunction::Input => {
                mux.write(iomux_function(gpio_function(pin)));
                GPEC.write(1u32.checked_shl(u32::from(pin)).unwrap_or(0));
            }
        }
    }
}

impl BufferAllocator for Esp8266 {
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        GlobalHeap.allocate(layout)
    }

    unsafe fn release(&mut self, block: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded; blocks come from GlobalHeap.
        unsafe { GlobalHeap.release(block, layout) }
    }
}

// ── critical-section ────────────────────────────────────────────────────────

struct PsCriticalSection;
critical_section::set_impl!(PsCriticalSection);

// SAFETY: `rsil 15` masks every maskable interrupt level and hands back the
// previous PS; `release` writes that PS back, so a section taken inside the
// SLC handler returns to the handler's own level rather than to level 0.
unsafe impl critical_section::Impl for PsCriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        let ps: u32;
        // SAFETY: only changes PS.INTLEVEL.
        unsafe { core::arch::asm!("rsil {0}, 15", out(reg) ps, options(nostack)) };
        ps
    }

    unsafe fn release(ps: critical_section::RawRestoreState) {
        // SAFETY: `ps` is the value the matching `acquire` returned.
        unsafe { core::arch::asm!("wsr.ps {0}", "rsync", in(reg) ps, options(nostack)) };
    }
}
