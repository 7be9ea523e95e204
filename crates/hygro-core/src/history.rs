//! Fixed-capacity circular store backing the measurement history.
//!
//! Overwrite-when-full semantics: the store always accepts the newest sample
//! and trades the oldest for it, which is exactly what a rolling graph window
//! wants. Capacity is chosen once at construction (derived from display
//! geometry by the caller) and never changes.

use alloc::vec::Vec;

use thiserror_no_std::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingStoreError {
    #[error("ring store capacity must be greater than zero")]
    ZeroCapacity,
    #[error("failed to allocate backing storage for {capacity} elements")]
    Alloc { capacity: usize },
    #[error("ring store is empty")]
    Empty,
    #[error("logical index {index} out of range for {len} stored elements")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Fixed-capacity ring over a contiguous preallocated block.
///
/// Represented as a (head, tail, full) triple with modulo arithmetic:
/// `head` is the next write slot, `tail` the oldest live element, and `full`
/// disambiguates the `head == tail` case. Logical order is oldest-first from
/// `tail` to `head - 1` (mod capacity).
pub struct RingStore<T> {
    storage: Vec<T>,
    head: usize,
    tail: usize,
    full: bool,
}

impl<T: Default + Clone> RingStore<T> {
    /// Allocate a store for exactly `capacity` elements.
    ///
    /// Allocation failure is reported as [`RingStoreError::Alloc`] rather
    /// than aborting; a zero capacity is a caller contract violation.
    pub fn new(capacity: usize) -> Result<Self, RingStoreError> {
        if capacity == 0 {
            return Err(RingStoreError::ZeroCapacity);
        }
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| RingStoreError::Alloc { capacity })?;
        storage.resize(capacity, T::default());
        Ok(Self {
            storage,
            head: 0,
            tail: 0,
            full: false,
        })
    }

    /// Store `item`, silently discarding the oldest element when full.
    ///
    /// Never fails and never blocks.
    pub fn put(&mut self, item: T) {
        self.storage[self.head] = item;
        if self.full {
            self.tail = (self.tail + 1) % self.capacity();
        }
        self.head = (self.head + 1) % self.capacity();
        self.full = self.head == self.tail;
    }

    /// Remove and return the oldest element.
    pub fn get(&mut self) -> Result<T, RingStoreError> {
        if self.is_empty() {
            return Err(RingStoreError::Empty);
        }
        let item = core::mem::take(&mut self.storage[self.tail]);
        self.tail = (self.tail + 1) % self.capacity();
        self.full = false;
        Ok(item)
    }

    /// Read-only access to the `index`-th oldest element.
    pub fn peek_at(&self, index: usize) -> Result<&T, RingStoreError> {
        if index >= self.len() {
            return Err(RingStoreError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(&self.storage[(self.tail + index) % self.capacity()])
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        if self.full {
            self.capacity()
        } else if self.head >= self.tail {
            self.head - self.tail
        } else {
            self.capacity() + self.head - self.tail
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Logically empty the store in place. The backing allocation is kept;
    /// previously stored values become unreachable through this API.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.full = false;
        for slot in &mut self.storage {
            *slot = T::default();
        }
    }

    /// Iterate the live elements oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len()).map(move |i| &self.storage[(self.tail + i) % self.capacity()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, values: &[i32]) -> RingStore<i32> {
        let mut store = RingStore::new(capacity).unwrap();
        for &v in values {
            store.put(v);
        }
        store
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            RingStore::<i32>::new(0).err(),
            Some(RingStoreError::ZeroCapacity)
        );
    }

    #[test]
    fn test_len_is_min_of_puts_and_capacity() {
        for n in 0..10 {
            let store = filled(4, &alloc::vec![7; n]);
            assert_eq!(store.len(), n.min(4));
        }
    }

    #[test]
    fn test_empty_and_full_flags() {
        let mut store = RingStore::new(3).unwrap();
        assert!(store.is_empty());
        assert!(!store.is_full());

        store.put(1);
        assert!(!store.is_empty());
        assert!(!store.is_full());

        store.put(2);
        store.put(3);
        assert!(store.is_full());
        assert_eq!(store.len(), store.capacity());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let store = filled(5, &[10, 11, 12]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.peek_at(0), Ok(&10));
        assert_eq!(store.peek_at(1), Ok(&11));
        assert_eq!(store.peek_at(2), Ok(&12));
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let store = filled(3, &[1, 2, 3, 4]);
        let live: alloc::vec::Vec<i32> = store.iter().copied().collect();
        assert_eq!(live, [2, 3, 4]);
    }

    #[test]
    fn test_capacity_plus_one_puts() {
        // v0..=vC into capacity C: v0 evicted, newest at the end.
        let capacity = 4;
        let values: alloc::vec::Vec<i32> = (0..=capacity as i32).collect();
        let store = filled(capacity, &values);
        assert_eq!(store.peek_at(0), Ok(&1));
        assert_eq!(store.peek_at(store.len() - 1), Ok(&(capacity as i32)));
    }

    #[test]
    fn test_capacity_one_always_keeps_newest() {
        let mut store = RingStore::new(1).unwrap();
        store.put(1);
        assert!(store.is_full());
        store.put(2);
        assert!(store.is_full());
        assert_eq!(store.peek_at(0), Ok(&2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_drains_oldest_first() {
        let mut store = filled(3, &[1, 2, 3, 4]);
        assert_eq!(store.get(), Ok(2));
        assert!(!store.is_full());
        assert_eq!(store.get(), Ok(3));
        assert_eq!(store.get(), Ok(4));
        assert_eq!(store.get(), Err(RingStoreError::Empty));
        assert!(store.is_empty());
    }

    #[test]
    fn test_peek_out_of_range() {
        let store = filled(4, &[1, 2]);
        assert_eq!(
            store.peek_at(2),
            Err(RingStoreError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            store.peek_at(usize::MAX),
            Err(RingStoreError::IndexOutOfRange {
                index: usize::MAX,
                len: 2
            })
        );
    }

    #[test]
    fn test_reset_empties_without_realloc() {
        let mut store = filled(3, &[1, 2, 3]);
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 3);
        assert_eq!(store.get(), Err(RingStoreError::Empty));

        // Store is fully usable again after reset.
        store.put(9);
        assert_eq!(store.peek_at(0), Ok(&9));
    }

    #[test]
    fn test_order_survives_long_wraparound() {
        let mut store = RingStore::new(5).unwrap();
        for v in 0..1000 {
            store.put(v);
        }
        let live: alloc::vec::Vec<i32> = store.iter().copied().collect();
        assert_eq!(live, [995, 996, 997, 998, 999]);
    }

    #[test]
    fn test_interleaved_put_get_keeps_invariants() {
        let mut store = RingStore::new(3).unwrap();
        store.put(1);
        store.put(2);
        assert_eq!(store.get(), Ok(1));
        store.put(3);
        store.put(4);
        assert!(store.is_full());
        store.put(5);
        let live: alloc::vec::Vec<i32> = store.iter().copied().collect();
        assert_eq!(live, [3, 4, 5]);
    }
}
