//! Underrun trip-wire.
//!
//! Every refilled slot is pushed here. Nothing consumes the queue, so once
//! it holds `GUARD_CAPACITY` entries each further push evicts the oldest
//! one; an eviction is the signal that the ring has cycled with no reader
//! keeping pace. The queue only ever bounds itself.

use heapless::Deque;

use crate::config::GUARD_CAPACITY;

/// Bounded FIFO of recently refilled buffer slots.
#[derive(Debug)]
pub struct UnderrunGuard {
    recent: Deque<usize, GUARD_CAPACITY>,
}

impl UnderrunGuard {
    /// Empty guard.
    pub const fn new() -> Self {
        Self {
            recent: Deque::new(),
        }
    }

    /// Record `slot`. At capacity the oldest entry is evicted first and
    /// returned.
    pub fn push(&mut self, slot: usize) -> Option<usize> {
        let evicted = if self.recent.is_full() {
            self.recent.pop_front()
        } else {
            None
        };
        // Room for one entry is guaranteed by the eviction above.
        let _ = self.recent.push_back(slot);
        evicted
    }

    /// Entries currently held.
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    /// True before the first push.
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Whether the next push will evict.
    pub fn is_full(&self) -> bool {
        self.recent.is_full()
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        GUARD_CAPACITY
    }

    /// Held slots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.recent.iter().copied()
    }
}

impl Default for UnderrunGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    // ── Test A ── filling up to capacity never evicts
    #[test]
    fn fills_without_eviction() {
        let mut guard = UnderrunGuard::new();
        for slot in 0..GUARD_CAPACITY {
            assert_eq!(guard.push(slot), None);
        }
        assert!(guard.is_full());
        assert_eq!(guard.len(), GUARD_CAPACITY);
    }

    // ── Test B ── push at capacity evicts exactly the oldest entry
    #[test]
    fn push_at_capacity_evicts_oldest() {
        let mut guard = UnderrunGuard::new();
        guard.push(0);
        guard.push(1);
        guard.push(2);
        assert_eq!(guard.push(3), Some(0));
        assert_eq!(guard.len(), 3);
        assert_eq!(guard.iter().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(guard.push(0), Some(1));
        assert_eq!(guard.iter().collect::<Vec<_>>(), [2, 3, 0]);
    }

    // ── Test C ── capacity is one less than the ring
    #[test]
    fn capacity_leaves_one_buffer_in_flight() {
        assert_eq!(
            UnderrunGuard::new().capacity(),
            crate::config::BUFFER_COUNT - 1
        );
    }

    proptest::proptest! {
        /// Length never exceeds capacity and eviction order is FIFO.
        #[test]
        fn bounded_and_fifo(slots in proptest::collection::vec(0usize..8, 0..64)) {
            let mut guard = UnderrunGuard::new();
            let mut model = std::collections::VecDeque::new();
            for slot in slots {
                let expected = if model.len() == GUARD_CAPACITY { model.pop_front() } else { None };
                model.push_back(slot);
                assert_eq!(guard.push(slot), expected);
                assert!(guard.len() <= GUARD_CAPACITY);
                assert_eq!(guard.len(), model.len());
            }
        }
    }
}
