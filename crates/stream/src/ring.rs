//! Circular descriptor ring over the buffer pool.
//!
//! Descriptor `i` is bound to buffer `i` and linked to descriptor
//! `(i + 1) % BUFFER_COUNT`. Every descriptor is an end-of-frame unit, so
//! the engine raises one interrupt per finished buffer and then carries on
//! with the next one without software involvement.

use core::ptr;

use platform::{LinkDescriptor, Owner};

use crate::config::BUFFER_COUNT;
use crate::pool::BufferPool;

const UNWIRED: LinkDescriptor = LinkDescriptor::new();

/// Fixed ring of `BUFFER_COUNT` link descriptors.
///
/// The descriptors link to each other by address, so the ring must be
/// wired only once it sits in its final location and must not move while
/// the DMA engine can see it.
#[derive(Debug)]
pub struct DescriptorRing {
    descriptors: [LinkDescriptor; BUFFER_COUNT],
    wired: bool,
}

impl DescriptorRing {
    /// Unwired ring, every descriptor zeroed.
    pub const fn new() -> Self {
        Self {
            descriptors: [UNWIRED; BUFFER_COUNT],
            wired: false,
        }
    }

    /// Bind every descriptor to its pool buffer and close the cycle.
    ///
    /// Returns `false` without touching anything if the ring was already
    /// wired; the binding is fixed for the life of a session.
    #[allow(clippy::cast_possible_truncation)] // BUFFER_BYTES <= 0xFFF, asserted in config
    pub fn wire(&mut self, pool: &BufferPool) -> bool {
        if self.wired {
            return false;
        }
        let bytes = pool.buffer_bytes() as u16;
        let base = self.descriptors.as_mut_ptr();
        for (slot, descriptor) in self.descriptors.iter_mut().enumerate() {
            let successor = slot.wrapping_add(1) % BUFFER_COUNT;
            descriptor.set_size(bytes);
            descriptor.set_length(bytes);
            descriptor.set_sub_sof(false);
            descriptor.set_eof(true);
            descriptor.set_owner(Owner::Dma);
            descriptor.set_buffer(pool.buffer_ptr(slot).unwrap_or(ptr::null_mut()));
            descriptor.set_next(base.wrapping_add(successor));
        }
        self.wired = true;
        true
    }

    /// Whether [`DescriptorRing::wire`] has run.
    pub fn is_wired(&self) -> bool {
        self.wired
    }

    /// First descriptor; the engine starts here.
    pub fn head(&self) -> *const LinkDescriptor {
        self.descriptors.as_ptr()
    }

    /// Address of descriptor `slot`.
    pub fn address(&self, slot: usize) -> Option<*const LinkDescriptor> {
        self.descriptors
            .get(slot)
            .map(|descriptor| descriptor as *const LinkDescriptor)
    }

    /// Descriptor `slot`.
    pub fn descriptor(&self, slot: usize) -> Option<&LinkDescriptor> {
        self.descriptors.get(slot)
    }

    /// Map a descriptor address reported by the engine back to its slot.
    pub fn slot_of(&self, address: *const LinkDescriptor) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|descriptor| ptr::eq(descriptor, address))
    }

    /// Number of `next` hops from `slot` back to itself, or `None` if the
    /// chain leaves the ring or does not return within `BUFFER_COUNT` hops.
    pub fn cycle_len(&self, slot: usize) -> Option<usize> {
        let mut current = slot;
        for hops in 1..=BUFFER_COUNT {
            current = self.slot_of(self.descriptors.get(current)?.next())?;
            if current == slot {
                return Some(hops);
            }
        }
        None
    }
}

impl Default for DescriptorRing {
    fn default() -> Self {
        Self::new()
    }
}
