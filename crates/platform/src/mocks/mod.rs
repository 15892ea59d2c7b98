//! Mock implementations for testing
//!
//! [`MockBoard`] implements every platform trait. It records each hardware
//! call as an [`HwEvent`] so tests can assert ordering, and it walks the
//! programmed descriptor chain the way the DMA engine would, so tests can
//! inject completion interrupts.

#![cfg(any(test, feature = "std"))]

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::ffi::c_void;
use core::ptr::{self, NonNull};
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::*;

/// Base clock reported by [`MockBoard::new`], same as the ESP8266 I2S block.
pub const MOCK_BASE_CLOCK_HZ: u32 = 160_000_000;

/// One recorded hardware call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwEvent {
    /// [`LinkDma::reset_links`]
    ResetLinks,
    /// [`LinkDma::configure_outbound`]
    ConfigureOutbound,
    /// [`LinkDma::set_links`], addresses as integers
    SetLinks {
        /// Outbound descriptor address.
        outbound: usize,
        /// Inbound descriptor address.
        inbound: usize,
    },
    /// [`LinkDma::clear_links`]
    ClearLinks,
    /// [`LinkDma::start_links`]
    StartLinks,
    /// [`LinkDma::enable_eof_interrupt`]
    EnableEofInterrupt,
    /// [`LinkDma::disable_interrupts`]
    DisableDmaInterrupts,
    /// [`LinkDma::clear_interrupts`]
    ClearDmaInterrupts,
    /// [`InterruptLine::attach_isr`]
    AttachIsr,
    /// [`InterruptLine::detach_isr`]
    DetachIsr,
    /// [`InterruptLine::enable_isr`]
    EnableIsr,
    /// [`InterruptLine::disable_isr`]
    DisableIsr,
    /// [`SerialAudio::reset_serial`]
    ResetSerial,
    /// [`SerialAudio::enable_dma_fifo`]
    EnableDmaFifo,
    /// [`SerialAudio::set_clock_dividers`]
    SetClockDividers(ClockDividers),
    /// [`SerialAudio::start_transmit`]
    StartTransmit,
    /// [`SerialAudio::stop_transmit`]
    StopTransmit,
    /// [`PeripheralClock::enable_clock`]
    EnableClock,
    /// [`PeripheralClock::disable_clock`]
    DisableClock,
    /// [`PinMux::set_pin_function`]
    SetPin {
        /// GPIO number.
        pin: u8,
        /// Selected function.
        function: PinFunction,
    },
    /// Successful [`BufferAllocator::allocate`]
    Allocate {
        /// Requested size.
        bytes: usize,
    },
    /// Refused [`BufferAllocator::allocate`]
    AllocationRefused {
        /// Requested size.
        bytes: usize,
    },
    /// [`BufferAllocator::release`]
    Release {
        /// Released size.
        bytes: usize,
    },
}

/// An interrupt the mock controller would deliver now.
#[derive(Debug, Clone, Copy)]
pub struct PendingIsr {
    handler: IsrHandler,
    context: *mut c_void,
}

impl PendingIsr {
    /// Run the attached handler with its context.
    ///
    /// # Safety
    ///
    /// The context registered with [`InterruptLine::attach_isr`] must still be
    /// valid, and no borrow of the object behind it may be held by the caller.
    pub unsafe fn dispatch(self) {
        // SAFETY: forwarded to the caller.
        unsafe { (self.handler)(self.context) }
    }
}

/// Ticket counter shared by a [`MockBoard`] and test code.
///
/// Every recorded [`HwEvent`] takes a ticket, so anything else that takes
/// one (a render callback, say) can be ordered against the hardware calls.
#[derive(Debug, Clone, Default)]
pub struct Sequence(Arc<AtomicUsize>);

impl Sequence {
    /// Next ticket.
    pub fn tick(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// Simulated board with an SLC-like DMA engine.
pub struct MockBoard {
    base_clock_hz: u32,
    refuse_allocations: bool,
    events: Vec<HwEvent>,
    stamps: Vec<usize>,
    sequence: Sequence,
    cursor: *const LinkDescriptor,
    finished: *const LinkDescriptor,
    links_running: bool,
    eof_enabled: bool,
    eof_pending: bool,
    handler: Option<(IsrHandler, *mut c_void)>,
    isr_enabled: bool,
    live_allocations: usize,
    clock_enabled: bool,
    transmitting: bool,
    dividers: Option<ClockDividers>,
    pins: Vec<(u8, PinFunction)>,
}

// SAFETY: the raw pointers are descriptor addresses and an interrupt
// context owned by whoever owns the board; the mock never shares them.
unsafe impl Send for MockBoard {}

impl MockBoard {
    /// Board with a 160 MHz audio base clock and a working allocator.
    pub fn new() -> Self {
        Self {
            base_clock_hz: MOCK_BASE_CLOCK_HZ,
            refuse_allocations: false,
            events: Vec::new(),
            stamps: Vec::new(),
            sequence: Sequence::default(),
            cursor: ptr::null(),
            finished: ptr::null(),
            links_running: false,
            eof_enabled: false,
            eof_pending: false,
            handler: None,
            isr_enabled: false,
            live_allocations: 0,
            clock_enabled: false,
            transmitting: false,
            dividers: None,
            pins: Vec::new(),
        }
    }

    /// Report a different base clock.
    #[must_use]
    pub fn with_base_clock(mut self, hz: u32) -> Self {
        self.base_clock_hz = hz;
        self
    }

    /// Make every allocation fail, as if the heap were exhausted.
    #[must_use]
    pub fn refusing_allocations(mut self) -> Self {
        self.refuse_allocations = true;
        self
    }

    /// Hardware calls recorded so far, oldest first.
    pub fn events(&self) -> &[HwEvent] {
        &self.events
    }

    /// Recorded calls paired with their [`Sequence`] tickets.
    pub fn stamped_events(&self) -> impl Iterator<Item = (usize, HwEvent)> + '_ {
        self.stamps.iter().copied().zip(self.events.iter().copied())
    }

    /// Handle on the ticket counter this board stamps events with.
    pub fn sequence(&self) -> Sequence {
        self.sequence.clone()
    }

    /// Forget recorded calls.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.stamps.clear();
    }

    /// Blocks allocated and not yet released.
    pub fn live_allocations(&self) -> usize {
        self.live_allocations
    }

    /// Whether a handler is attached.
    pub fn is_isr_attached(&self) -> bool {
        self.handler.is_some()
    }

    /// Whether the interrupt source is unmasked.
    pub fn is_isr_enabled(&self) -> bool {
        self.isr_enabled
    }

    /// Whether the DMA links were started and not cleared since.
    pub fn links_running(&self) -> bool {
        self.links_running
    }

    /// Whether the audio clock is ungated.
    pub fn clock_enabled(&self) -> bool {
        self.clock_enabled
    }

    /// Whether the transmitter is running.
    pub fn transmitting(&self) -> bool {
        self.transmitting
    }

    /// Last programmed dividers.
    pub fn dividers(&self) -> Option<ClockDividers> {
        self.dividers
    }

    /// Function last selected on `pin`.
    pub fn pin_function(&self, pin: u8) -> Option<PinFunction> {
        self.pins
            .iter()
            .find(|(p, _)| *p == pin)
            .map(|(_, function)| *function)
    }

    /// Finish the descriptor under the engine's cursor and move to its
    /// successor. Returns the finished descriptor.
    pub fn advance(&mut self) -> Option<*const LinkDescriptor> {
        if !self.links_running || self.cursor.is_null() {
            return None;
        }
        let finished = self.cursor;
        // SAFETY: `set_links` requires programmed descriptors to stay valid
        // until `clear_links`, which also stops the links.
        let (next, eof) = unsafe { ((*finished).next(), (*finished).is_eof()) };
        self.finished = finished;
        self.cursor = next;
        if eof && self.eof_enabled {
            self.eof_pending = true;
        }
        Some(finished)
    }

    /// Finish one descriptor and return the interrupt the controller would
    /// deliver for it, if the line is attached and unmasked.
    pub fn raise_completion(&mut self) -> Option<PendingIsr> {
        self.advance()?;
        self.pending_isr()
    }

    /// Fire the line without any DMA class pending.
    pub fn raise_spurious(&mut self) -> Option<PendingIsr> {
        self.pending_isr()
    }

    fn pending_isr(&self) -> Option<PendingIsr> {
        if !self.isr_enabled {
            return None;
        }
        self.handler
            .map(|(handler, context)| PendingIsr { handler, context })
    }

    fn record(&mut self, event: HwEvent) {
        self.stamps.push(self.sequence.tick());
        self.events.push(event);
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkDma for MockBoard {
    fn reset_links(&mut self) {
        self.record(HwEvent::ResetLinks);
    }

    fn configure_outbound(&mut self) {
        self.record(HwEvent::ConfigureOutbound);
    }

    unsafe fn set_links(&mut self, outbound: *const LinkDescriptor, inbound: *const LinkDescriptor) {
        self.cursor = outbound;
        self.record(HwEvent::SetLinks {
            outbound: outbound as usize,
            inbound: inbound as usize,
        });
    }

    fn clear_links(&mut self) {
        self.cursor = ptr::null();
        self.finished = ptr::null();
        self.links_running = false;
        self.record(HwEvent::ClearLinks);
    }

    fn start_links(&mut self) {
        self.links_running = true;
        self.record(HwEvent::StartLinks);
    }

    fn enable_eof_interrupt(&mut self) {
        self.eof_enabled = true;
        self.record(HwEvent::EnableEofInterrupt);
    }

    fn disable_interrupts(&mut self) {
        self.eof_enabled = false;
        self.record(HwEvent::DisableDmaInterrupts);
    }

    fn clear_interrupts(&mut self) {
        self.eof_pending = false;
        self.record(HwEvent::ClearDmaInterrupts);
    }

    fn take_interrupts(&mut self) -> DmaInterrupts {
        let pending = DmaInterrupts {
            outbound_eof: self.eof_pending,
        };
        self.eof_pending = false;
        pending
    }

    fn finished_descriptor(&self) -> *const LinkDescriptor {
        self.finished
    }
}

impl InterruptLine for MockBoard {
    unsafe fn attach_isr(&mut self, handler: IsrHandler, context: *mut c_void) {
        self.handler = Some((handler, context));
        self.record(HwEvent::AttachIsr);
    }

    fn detach_isr(&mut self) {
        self.handler = None;
        self.record(HwEvent::DetachIsr);
    }

    fn enable_isr(&mut self) {
        self.isr_enabled = true;
        self.record(HwEvent::EnableIsr);
    }

    fn disable_isr(&mut self) {
        self.isr_enabled = false;
        self.record(HwEvent::DisableIsr);
    }
}

impl SerialAudio for MockBoard {
    fn base_clock_hz(&self) -> u32 {
        self.base_clock_hz
    }

    fn reset_serial(&mut self) {
        self.transmitting = false;
        self.record(HwEvent::ResetSerial);
    }

    fn enable_dma_fifo(&mut self) {
        self.record(HwEvent::EnableDmaFifo);
    }

    fn set_clock_dividers(&mut self, dividers: ClockDividers) {
        self.dividers = Some(dividers);
        self.record(HwEvent::SetClockDividers(dividers));
    }

    fn start_transmit(&mut self) {
        self.transmitting = true;
        self.record(HwEvent::StartTransmit);
    }

    fn stop_transmit(&mut self) {
        self.transmitting = false;
        self.record(HwEvent::StopTransmit);
    }
}

impl PeripheralClock for MockBoard {
    fn enable_clock(&mut self) {
        self.clock_enabled = true;
        self.record(HwEvent::EnableClock);
    }

    fn disable_clock(&mut self) {
        self.clock_enabled = false;
        self.record(HwEvent::DisableClock);
    }
}

impl PinMux for MockBoard {
    const I2S_PINS: &'static [PinRoute] = &[
        PinRoute::new(15, PinFunction::Alternate(1), PinFunction::Input),
        PinRoute::new(3, PinFunction::Alternate(1), PinFunction::Alternate(0)),
        PinRoute::new(2, PinFunction::Alternate(1), PinFunction::Input),
    ];

    fn set_pin_function(&mut self, pin: u8, function: PinFunction) {
        match self.pins.iter_mut().find(|(p, _)| *p == pin) {
            Some(entry) => entry.1 = function,
            None => self.pins.push((pin, function)),
        }
        self.record(HwEvent::SetPin { pin, function });
    }
}

impl BufferAllocator for MockBoard {
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        if self.refuse_allocations {
            self.record(HwEvent::AllocationRefused {
                bytes: layout.size(),
            });
            return None;
        }
        let block = GlobalHeap.allocate(layout)?;
        self.live_allocations = self.live_allocations.saturating_add(1);
        self.record(HwEvent::Allocate {
            bytes: layout.size(),
        });
        Some(block)
    }

    unsafe fn release(&mut self, block: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded contract; blocks come from GlobalHeap above.
        unsafe { GlobalHeap.release(block, layout) };
        self.live_allocations = self.live_allocations.saturating_sub(1);
        self.record(HwEvent::Release {
            bytes: layout.size(),
        });
    }
}
