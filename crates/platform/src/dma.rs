//! DMA abstraction layer
//!
//! Link-list DMA: the engine walks a chain of [`LinkDescriptor`]s, streams
//! each descriptor's buffer to the peripheral and raises an end-of-frame
//! interrupt after every descriptor that carries the `eof` flag.
//!
//! # Descriptor word 0
//!
//! ```text
//!  31     30    29       28..24   23..12    11..0
//! owner | eof | sub_sof | unused | datalen | blocksize
//! ```

use core::ptr;

/// Largest value the 12-bit `blocksize` and `datalen` fields can hold.
pub const MAX_DESCRIPTOR_BYTES: usize = 0xFFF;

const FIELD_MASK: u32 = 0xFFF;
const BLOCKSIZE_SHIFT: u32 = 0;
const DATALEN_SHIFT: u32 = 12;
const SUB_SOF_BIT: u32 = 1 << 29;
const EOF_BIT: u32 = 1 << 30;
const OWNER_BIT: u32 = 1 << 31;

/// Which side may touch a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Owner {
    /// Software owns the descriptor.
    Cpu,
    /// The DMA engine owns the descriptor.
    Dma,
}

/// Hardware link-list descriptor.
///
/// Three words on the target: flags, buffer address, next descriptor
/// address. The layout is read by the DMA engine, so it is `repr(C)` and
/// must not move once its address has been handed to hardware.
#[derive(Debug)]
#[repr(C, align(4))]
pub struct LinkDescriptor {
    flags: u32,
    buffer: *mut u8,
    next: *mut LinkDescriptor,
}

#[cfg(target_pointer_width = "32")]
const _: () = assert!(core::mem::size_of::<LinkDescriptor>() == 12);

// SAFETY: a descriptor is plain data plus two addresses. Whoever owns the
// descriptor owns the memory it points at; moving it between contexts does
// not alias anything.
unsafe impl Send for LinkDescriptor {}

impl LinkDescriptor {
    /// An all-zero descriptor: CPU-owned, no buffer, no successor.
    pub const fn new() -> Self {
        Self {
            flags: 0,
            buffer: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Raw flags word as the engine sees it.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Allocated size of the buffer in bytes (12-bit field).
    #[allow(clippy::cast_possible_truncation)] // masked to 12 bits
    pub fn size(&self) -> u16 {
        ((self.flags >> BLOCKSIZE_SHIFT) & FIELD_MASK) as u16
    }

    /// Set the buffer size; bits above the 12-bit field are dropped.
    pub fn set_size(&mut self, bytes: u16) {
        self.set_field(BLOCKSIZE_SHIFT, u32::from(bytes));
    }

    /// Number of valid bytes the engine will transfer (12-bit field).
    #[allow(clippy::cast_possible_truncation)] // masked to 12 bits
    pub fn length(&self) -> u16 {
        ((self.flags >> DATALEN_SHIFT) & FIELD_MASK) as u16
    }

    /// Set the transfer length; bits above the 12-bit field are dropped.
    pub fn set_length(&mut self, bytes: u16) {
        self.set_field(DATALEN_SHIFT, u32::from(bytes));
    }

    /// Whether finishing this descriptor raises an end-of-frame interrupt.
    pub fn is_eof(&self) -> bool {
        self.flags & EOF_BIT != 0
    }

    /// Mark this descriptor as an end-of-frame unit.
    pub fn set_eof(&mut self, eof: bool) {
        self.set_bit(EOF_BIT, eof);
    }

    /// Sub-start-of-frame flag. Unused for audio output.
    pub fn is_sub_sof(&self) -> bool {
        self.flags & SUB_SOF_BIT != 0
    }

    /// Set the sub-start-of-frame flag.
    pub fn set_sub_sof(&mut self, sub_sof: bool) {
        self.set_bit(SUB_SOF_BIT, sub_sof);
    }

    /// Current owner.
    pub fn owner(&self) -> Owner {
        if self.flags & OWNER_BIT == 0 {
            Owner::Cpu
        } else {
            Owner::Dma
        }
    }

    /// Hand the descriptor to the CPU or the engine.
    pub fn set_owner(&mut self, owner: Owner) {
        self.set_bit(OWNER_BIT, owner == Owner::Dma);
    }

    /// Buffer this descriptor points at.
    pub fn buffer(&self) -> *mut u8 {
        self.buffer
    }

    /// Point the descriptor at `buffer`.
    pub fn set_buffer(&mut self, buffer: *mut u8) {
        self.buffer = buffer;
    }

    /// Successor in the chain.
    pub fn next(&self) -> *mut LinkDescriptor {
        self.next
    }

    /// Link `next` after this descriptor.
    pub fn set_next(&mut self, next: *mut LinkDescriptor) {
        self.next = next;
    }

    fn set_field(&mut self, shift: u32, value: u32) {
        self.flags = (self.flags & !(FIELD_MASK << shift)) | ((value & FIELD_MASK) << shift);
    }

    fn set_bit(&mut self, bit: u32, on: bool) {
        if on {
            self.flags |= bit;
        } else {
            self.flags &= !bit;
        }
    }
}

impl Default for LinkDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt classes pending on the DMA engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaInterrupts {
    /// The outbound link finished an end-of-frame descriptor.
    pub outbound_eof: bool,
}

/// Link-list DMA engine feeding a peripheral FIFO.
///
/// Naming follows the data direction as seen from memory: *outbound* carries
/// samples to the peripheral. Some engines (the ESP8266 SLC among them) call
/// that link "RX"; the trait hides the vendor naming.
pub trait LinkDma {
    /// Pulse the reset bits of both link state machines.
    fn reset_links(&mut self);

    /// Configure the engine for memory-to-peripheral streaming.
    fn configure_outbound(&mut self);

    /// Program both link address registers.
    ///
    /// The inbound link is unused for output but some engines misbehave
    /// unless it also holds a valid descriptor address.
    ///
    /// # Safety
    ///
    /// Both pointers must reference wired descriptors that stay at the same
    /// address, with their buffers alive, until [`LinkDma::clear_links`].
    unsafe fn set_links(&mut self, outbound: *const LinkDescriptor, inbound: *const LinkDescriptor);

    /// Zero the link address registers.
    fn clear_links(&mut self);

    /// Set the start bits of both links.
    fn start_links(&mut self);

    /// Enable only the outbound end-of-frame interrupt class.
    fn enable_eof_interrupt(&mut self);

    /// Disable every DMA interrupt class.
    fn disable_interrupts(&mut self);

    /// Acknowledge every pending interrupt class.
    fn clear_interrupts(&mut self);

    /// Read the pending classes and acknowledge all of them.
    fn take_interrupts(&mut self) -> DmaInterrupts;

    /// Address of the descriptor the outbound link finished most recently.
    fn finished_descriptor(&self) -> *const LinkDescriptor;
}
