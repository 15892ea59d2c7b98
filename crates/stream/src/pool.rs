//! Sample buffer pool.
//!
//! All `BUFFER_COUNT` buffers live in one contiguous, word-aligned,
//! zero-initialised block taken from a [`BufferAllocator`]. The block is
//! allocated when a session starts and released in one piece when it
//! stops; individual buffers are only ever overwritten in place.

use core::alloc::Layout;
use core::ptr::NonNull;

use platform::{BufferAllocator, Frame};

use crate::config::{BUFFER_BYTES, BUFFER_COUNT, BUFFER_FRAMES};
use crate::error::StreamError;

#[repr(C, align(4))]
struct Slab([[Frame; BUFFER_FRAMES]; BUFFER_COUNT]);

/// Owner of the session's sample memory.
///
/// Not `Clone`; dropping it without [`BufferPool::release`] leaks the block.
#[derive(Debug)]
pub struct BufferPool {
    slab: NonNull<Slab>,
}

// SAFETY: the pool is the only owner of its block; moving it to another
// context moves that ownership.
unsafe impl Send for BufferPool {}

impl BufferPool {
    /// Layout of the whole block.
    pub fn layout() -> Layout {
        Layout::new::<Slab>()
    }

    /// Take one zeroed block big enough for every buffer.
    ///
    /// # Errors
    ///
    /// [`StreamError::Allocation`] if the allocator refuses. Nothing is
    /// allocated in that case.
    pub fn allocate<A>(allocator: &mut A) -> Result<Self, StreamError>
    where
        A: BufferAllocator + ?Sized,
    {
        let layout = Self::layout();
        let block = allocator.allocate(layout).ok_or(StreamError::Allocation {
            bytes: layout.size(),
        })?;
        Ok(Self { slab: block.cast() })
    }

    /// Hand the block back to `allocator`.
    ///
    /// Any descriptor still pointing into the pool must already be
    /// unreachable by the DMA engine.
    pub fn release<A>(self, allocator: &mut A)
    where
        A: BufferAllocator + ?Sized,
    {
        // SAFETY: the block came from `allocate` with this same layout, and
        // `self` is consumed so no buffer access can follow.
        unsafe { allocator.release(self.slab.cast(), Self::layout()) }
    }

    /// Number of buffers.
    pub const fn len(&self) -> usize {
        BUFFER_COUNT
    }

    /// Always false; a pool holds at least two buffers.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Size of one buffer in bytes.
    pub const fn buffer_bytes(&self) -> usize {
        BUFFER_BYTES
    }

    /// Address of buffer `slot`, as handed to a descriptor.
    pub fn buffer_ptr(&self, slot: usize) -> Option<*mut u8> {
        self.buffer_raw(slot).map(|buffer| buffer.cast::<u8>())
    }

    /// Buffer `slot` as frames.
    pub fn frames(&self, slot: usize) -> Option<&[Frame]> {
        let buffer = self.buffer_raw(slot)?;
        // SAFETY: `buffer_raw` only returns in-bounds buffers of the live
        // block, and `&self` excludes writers.
        Some(unsafe { &*buffer })
    }

    /// Buffer `slot` as mutable frames.
    pub fn frames_mut(&mut self, slot: usize) -> Option<&mut [Frame]> {
        let buffer = self.buffer_raw(slot)?;
        // SAFETY: as in `frames`, and `&mut self` makes the borrow unique on
        // the CPU side.
        Some(unsafe { &mut *buffer })
    }

    fn buffer_raw(&self, slot: usize) -> Option<*mut [Frame; BUFFER_FRAMES]> {
        if slot >= BUFFER_COUNT {
            return None;
        }
        // Slab is repr(C) around the buffer array, so it starts at offset 0.
        let first = self.slab.as_ptr().cast::<[Frame; BUFFER_FRAMES]>();
        Some(first.wrapping_add(slot))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::MockBoard;
    use platform::GlobalHeap;

    #[test]
    fn layout_covers_every_buffer_word_aligned() {
        let layout = BufferPool::layout();
        assert_eq!(layout.size(), BUFFER_COUNT * BUFFER_BYTES);
        assert!(layout.align() >= 4);
    }

    #[test]
    fn fresh_pool_is_silent() {
        let mut heap = GlobalHeap;
        let pool = BufferPool::allocate(&mut heap).unwrap();
        for slot in 0..pool.len() {
            assert!(pool.frames(slot).unwrap().iter().all(|f| *f == [0, 0]));
        }
        pool.release(&mut heap);
    }

    #[test]
    fn buffers_are_disjoint_and_contiguous() {
        let mut heap = GlobalHeap;
        let pool = BufferPool::allocate(&mut heap).unwrap();
        let base = pool.buffer_ptr(0).unwrap() as usize;
        for slot in 0..BUFFER_COUNT {
            let addr = pool.buffer_ptr(slot).unwrap() as usize;
            assert_eq!(addr, base + slot * pool.buffer_bytes());
            assert_eq!(addr % 4, 0);
        }
        assert!(pool.buffer_ptr(BUFFER_COUNT).is_none());
        assert_eq!(pool.buffer_bytes(), BUFFER_BYTES);
        pool.release(&mut heap);
    }

    #[test]
    fn writes_land_in_the_addressed_slot_only() {
        let mut heap = GlobalHeap;
        let mut pool = BufferPool::allocate(&mut heap).unwrap();
        pool.frames_mut(2).unwrap().fill([7, -7]);
        assert!(pool.frames(1).unwrap().iter().all(|f| *f == [0, 0]));
        assert!(pool.frames(2).unwrap().iter().all(|f| *f == [7, -7]));
        assert!(pool.frames(3).unwrap().iter().all(|f| *f == [0, 0]));
        pool.release(&mut heap);
    }

    #[test]
    fn refused_allocation_reports_size() {
        let mut board = MockBoard::new().refusing_allocations();
        assert_eq!(
            BufferPool::allocate(&mut board).map(|_| ()),
            Err(StreamError::Allocation {
                bytes: BUFFER_COUNT * BUFFER_BYTES
            })
        );
    }

    #[test]
    fn release_returns_block_to_allocator() {
        let mut board = MockBoard::new();
        let pool = BufferPool::allocate(&mut board).unwrap();
        assert_eq!(board.live_allocations(), 1);
        pool.release(&mut board);
        assert_eq!(board.live_allocations(), 0);
    }
}
