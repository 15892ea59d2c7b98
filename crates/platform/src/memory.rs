//! Backing memory for DMA-visible sample buffers.

use core::alloc::Layout;
use core::ptr::NonNull;

/// Allocator for DMA buffers.
///
/// Returned memory must be zeroed and reachable by the DMA engine.
pub trait BufferAllocator {
    /// Allocate a zeroed block for `layout`, or `None` when memory is
    /// exhausted. `layout` never has size zero.
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>>;

    /// Return a block.
    ///
    /// # Safety
    ///
    /// `block` must come from [`BufferAllocator::allocate`] on this allocator
    /// with the same `layout`, and nothing may access it afterwards.
    unsafe fn release(&mut self, block: NonNull<u8>, layout: Layout);
}

/// Delegates to the `alloc` global allocator.
///
/// On the ESP8266 the whole heap is in DRAM, which the SLC engine can read.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalHeap;

impl BufferAllocator for GlobalHeap {
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // SAFETY: layout has non-zero size (checked above).
        NonNull::new(unsafe { alloc::alloc::alloc_zeroed(layout) })
    }

    unsafe fn release(&mut self, block: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees `block` came from `allocate` with `layout`.
        unsafe { alloc::alloc::dealloc(block.as_ptr(), layout) }
    }
}
